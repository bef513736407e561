use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API call failed with status {status}: {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data around.
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..end],
            body.len()
        )
    }

    /// Build the error for a non-success business response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::RequestFailed {
            status,
            body: Self::truncate_body(body),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept_verbatim() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        match err {
            ApiError::RequestFailed { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn long_bodies_are_truncated_at_a_char_boundary() {
        let body = "é".repeat(600);
        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, &body);
        match err {
            ApiError::RequestFailed { body, .. } => {
                assert!(body.contains("truncated"));
                assert!(body.len() < 600);
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }
}
