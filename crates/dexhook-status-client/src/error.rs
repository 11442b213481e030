//! Processing-status API client error types.

/// Errors from processing-status API calls.
///
/// Throttling (429/503) and connection failures are retried inside the
/// client and only surface as [`StatusApiError::ApiUnavailable`] once the
/// attempt bound is spent.
#[derive(Debug, thiserror::Error)]
pub enum StatusApiError {
    /// Transport error that is not worth retrying.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The API answered with a non-retryable, non-2xx status.
    #[error("processing status API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// A trace/span response lacked `trace_id` or `span_id`.
    #[error("Invalid PS API response from {endpoint}: {body}")]
    InvalidApiResponse { endpoint: String, body: String },
    /// Every attempt was throttled or failed to connect.
    #[error("Unable to send successful request to PS API ({endpoint}) after {attempts} attempts")]
    ApiUnavailable { endpoint: String, attempts: u32 },
    /// An id could not be placed into the request path.
    #[error("cannot build request URL for {endpoint} from base {base_url}")]
    InvalidUrl { endpoint: String, base_url: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl StatusApiError {
    /// Whether the failure is the service being unreachable rather than a
    /// rejected or malformed exchange.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ApiUnavailable { .. })
    }
}
