//! REST API client module.
//!
//! This module provides the `ApiClient` for communicating with the
//! prompt-filtering chat API: fetching filters and models, managing chat
//! sessions, submitting prompts, and checking token usage.
//!
//! Authentication uses an `X-API-Key` header to obtain a session token,
//! which is then attached to every request as `X-Auth-Token`.

pub mod client;
pub mod error;
pub mod request;

pub use client::{ApiClient, JsonObject};
pub use error::ApiError;
pub use request::ApiRequest;
