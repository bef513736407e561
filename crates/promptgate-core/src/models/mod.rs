//! Value types for request payloads.
//!
//! Endpoint responses are opaque JSON objects passed through to callers
//! unmodified; only outgoing payloads with internal structure get a type.

pub mod prompt;

pub use prompt::PromptSubmission;
