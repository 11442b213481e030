//! Processing-status API client configuration.
//!
//! Built explicitly by the caller and handed to [`crate::StatusClient::new`].
//! `from_env` reads the hook environment; `local_mock` points at a test
//! server with short delays.

use std::time::Duration;

use url::Url;

use crate::retry::RetryPolicy;

/// Configuration for connecting to the processing-status API.
#[derive(Debug, Clone)]
pub struct StatusApiConfig {
    /// Base URL; operation paths (`/api/trace`, ...) are appended to it.
    pub base_url: Url,
    /// Attempt bound and base delay for every call.
    pub retry: RetryPolicy,
    /// Per-request timeout in seconds. Also used as the connect timeout.
    pub timeout_secs: u64,
}

impl StatusApiConfig {
    /// Configuration with default retry policy and timeout.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            retry: RetryPolicy::default(),
            timeout_secs: 30,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PS_API_URL` (required)
    /// - `PS_API_MAX_RETRIES` (default: 6)
    /// - `PS_API_RETRY_DELAY_SECS` (default: 1, fractions allowed)
    /// - `PS_API_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("PS_API_URL").map_err(|_| ConfigError::MissingUrl)?;
        let base_url =
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl("PS_API_URL".into(), e.to_string()))?;

        let max_attempts: u32 = env_parse("PS_API_MAX_RETRIES", RetryPolicy::DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "PS_API_MAX_RETRIES".into(),
                "must be at least 1".into(),
            ));
        }

        let delay_secs: f64 = env_parse(
            "PS_API_RETRY_DELAY_SECS",
            RetryPolicy::DEFAULT_DELAY.as_secs_f64(),
        )?;
        let delay = Duration::try_from_secs_f64(delay_secs).map_err(|e| {
            ConfigError::InvalidValue("PS_API_RETRY_DELAY_SECS".into(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            retry: RetryPolicy::new(max_attempts, delay),
            timeout_secs: env_parse("PS_API_TIMEOUT_SECS", 30)?,
        })
    }

    /// Create a configuration pointing at a local mock server.
    ///
    /// Keeps the default attempt bound but shortens the retry delay and
    /// timeout so scripted failure sequences finish quickly.
    pub fn local_mock(uri: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(uri).map_err(|e| ConfigError::InvalidUrl(uri.to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            retry: RetryPolicy::new(RetryPolicy::DEFAULT_MAX_ATTEMPTS, Duration::from_millis(10)),
            timeout_secs: 5,
        })
    }
}

fn env_parse<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(var.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PS_API_URL environment variable is required")]
    MissingUrl,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
