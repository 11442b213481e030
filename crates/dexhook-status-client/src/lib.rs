//! # dexhook-status-client — Processing-Status API Client
//!
//! Typed access to the processing-status service that records an upload's
//! progress as a trace with one span per pipeline stage, plus JSON reports
//! attached to a stage.
//!
//! - **Traces** via `/api/trace/...`: create, look up, start and stop spans.
//! - **Reports** via `/api/report/json/uploadId/{upload_id}`.
//!
//! ## Retries
//!
//! Every operation goes through one [`RetryPolicy`]: throttled (429/503) and
//! unreachable attempts are retried with a fixed delay, anything else fails
//! at once. See [`retry`] for the exact rules.
//!
//! ## Ownership
//!
//! A [`StatusClient`] owns one connection pool. Sub-clients share it and the
//! pool is released when the last clone is dropped.

pub mod config;
pub mod error;
pub mod reports;
pub mod retry;
pub mod traces;
mod transport;

pub use config::{ConfigError, StatusApiConfig};
pub use error::StatusApiError;
pub use retry::RetryPolicy;

use std::time::Duration;

use transport::Transport;

/// Top-level processing-status client. Holds the sub-client for each
/// resource.
#[derive(Debug, Clone)]
pub struct StatusClient {
    traces: traces::TraceClient,
    reports: reports::ReportClient,
}

impl StatusClient {
    /// Create a new client from configuration.
    pub fn new(config: StatusApiConfig) -> Result<Self, StatusApiError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| StatusApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let transport = Transport::new(http, config.base_url, config.retry);
        Ok(Self {
            traces: traces::TraceClient::new(transport.clone()),
            reports: reports::ReportClient::new(transport),
        })
    }

    /// Access the trace and span client.
    pub fn traces(&self) -> &traces::TraceClient {
        &self.traces
    }

    /// Access the report client.
    pub fn reports(&self) -> &reports::ReportClient {
        &self.reports
    }
}
