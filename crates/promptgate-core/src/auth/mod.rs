//! Session-token management for the authenticated client.
//!
//! The server issues an opaque session token from the authenticate endpoint;
//! every other endpoint requires it. `Session` owns the current token and is
//! the single place it is stored or cleared.

pub mod session;

pub use session::{Session, SessionData};
