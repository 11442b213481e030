//! Bounded retry for processing-status API calls.
//!
//! One policy for every operation. Each logical call gets a fresh attempt
//! counter that is bumped before the outcome of an attempt is examined:
//!
//! - 2xx: return immediately.
//! - 429 / 503: wait (the `Retry-After` seconds if numeric and shorter than
//!   the base delay, otherwise the base delay) and try again.
//! - connection failure or timeout: wait the base delay and try again.
//! - any other status or transport error: fail at once.
//!
//! When the counter reaches the bound the call fails with
//! [`StatusApiError::ApiUnavailable`]. A failed attempt may still have
//! reached the service, so callers get at-least-once delivery.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;

use crate::error::StatusApiError;

/// Attempt bound and base delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first.
    pub max_attempts: u32,
    /// Wait between attempts; also the ceiling for `Retry-After`.
    pub delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Wait before retrying a throttled response.
    pub fn throttle_delay(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .filter(|server| *server < self.delay)
            .unwrap_or(self.delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// A successful response and the attempt it arrived on.
#[derive(Debug)]
pub(crate) struct Delivered {
    pub response: reqwest::Response,
    pub attempts: u32,
}

fn is_throttled(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
}

/// Send a request under `policy`.
///
/// `f` builds and sends one attempt; it is called at most
/// `policy.max_attempts` times.
pub(crate) async fn retry_send<F, Fut>(
    policy: &RetryPolicy,
    endpoint: &str,
    f: F,
) -> Result<Delivered, StatusApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt: u32 = 0;

    while attempt < policy.max_attempts {
        attempt += 1;

        let delay = match f().await {
            Ok(resp) if resp.status().is_success() => {
                return Ok(Delivered {
                    response: resp,
                    attempts: attempt,
                });
            }
            Ok(resp) if is_throttled(resp.status()) => {
                let delay = policy.throttle_delay(resp.headers());
                tracing::warn!(
                    endpoint,
                    attempt,
                    max_attempts = policy.max_attempts,
                    status = resp.status().as_u16(),
                    "processing status API throttled request, retrying in {delay:?}"
                );
                delay
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                return Err(StatusApiError::ApiError {
                    endpoint: endpoint.to_string(),
                    status,
                    body,
                });
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!(
                    endpoint,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "processing status API unreachable, retrying in {:?}: {e}",
                    policy.delay
                );
                policy.delay
            }
            Err(e) => {
                return Err(StatusApiError::Http {
                    endpoint: endpoint.to_string(),
                    source: e,
                });
            }
        };

        if attempt < policy.max_attempts {
            tokio::time::sleep(delay).await;
        }
    }

    Err(StatusApiError::ApiUnavailable {
        endpoint: endpoint.to_string(),
        attempts: attempt,
    })
}
