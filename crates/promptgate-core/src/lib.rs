//! Session-authenticated client for the prompt-filtering chat API.
//!
//! The client authenticates with a long-lived API key, holds the short-lived
//! session token the server issues, attaches it to every request, and
//! re-authenticates exactly once when the server reports the token expired.
//! Endpoint payloads are opaque JSON objects passed through unmodified.
//!
//! # Example
//!
//! ```no_run
//! use promptgate_core::{ApiClient, Config};
//!
//! # async fn run() -> Result<(), promptgate_core::ApiError> {
//! let client = ApiClient::new(Config::new("https://api.example.com", "my-api-key")?)?;
//! let models = client.fetch_models().await?;
//! println!("{:?}", models.get("models"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ApiRequest, JsonObject};
pub use auth::{Session, SessionData};
pub use config::{Config, ConfigError};
pub use models::PromptSubmission;
