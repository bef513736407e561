//! Client configuration.
//!
//! The client needs two pieces of configuration: the base URL of the API and
//! the long-lived API key used to obtain session tokens. Both are read from
//! the environment (`API_HOST`, `API_KEY`), with `.env` file support via
//! dotenvy, or supplied programmatically.

use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Environment variable holding the API base URL.
const HOST_VAR: &str = "API_HOST";

/// Environment variable holding the API key.
const API_KEY_VAR: &str = "API_KEY";

/// Environment variable overriding the request timeout, in seconds.
const TIMEOUT_VAR: &str = "API_TIMEOUT_SECS";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API_HOST must be set in the environment or a .env file")]
    MissingHost,

    #[error("API_KEY must be set in the environment or a .env file")]
    MissingApiKey,

    #[error("API_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Client configuration. Immutable for the lifetime of a client instance.
#[derive(Clone)]
pub struct Config {
    /// Base URL of the API, without a trailing slash.
    pub host: String,
    /// Long-lived secret used to obtain session tokens.
    pub api_key: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

impl Config {
    /// Build a configuration from explicit values, applying the same
    /// validation and normalization as [`Config::from_env`].
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::from_values(Some(host.into()), Some(api_key.into()), None)
    }

    /// Load configuration from the environment, honoring a `.env` file if
    /// one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_values(
            env::var(HOST_VAR).ok(),
            env::var(API_KEY_VAR).ok(),
            env::var(TIMEOUT_VAR).ok(),
        )
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn from_values(
        host: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self, ConfigError> {
        let host = host
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or(ConfigError::MissingHost)?;
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout = match timeout_secs {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|s| *s > 0)
                    .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            timeout,
        })
    }
}

// The API key is a secret and must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
