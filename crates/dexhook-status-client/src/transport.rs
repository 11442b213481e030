//! Shared request plumbing: URL building, retried sends, and trace/span
//! response decoding.

use dexhook_core::TraceSpan;
use serde_json::Value;
use url::Url;

use crate::error::StatusApiError;
use crate::retry::{retry_send, Delivered, RetryPolicy};

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url,
            retry,
        }
    }

    /// `{base_url}/{segments...}?{query...}`. Each segment is
    /// percent-encoded, so ids cannot alter the path.
    pub(crate) fn url(
        &self,
        endpoint: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, StatusApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StatusApiError::InvalidUrl {
                endpoint: endpoint.to_string(),
                base_url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send under the retry policy. `build` is called once per attempt.
    pub(crate) async fn send<F>(&self, endpoint: &str, build: F) -> Result<Delivered, StatusApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let delivered = retry_send(&self.retry, endpoint, || build(&self.http).send()).await?;
        tracing::debug!(
            endpoint,
            attempts = delivered.attempts,
            status = delivered.response.status().as_u16(),
            "processing status API call succeeded"
        );
        Ok(delivered)
    }

    /// Send, then decode a `{trace_id, span_id}` body.
    pub(crate) async fn send_for_span<F>(
        &self,
        endpoint: &str,
        build: F,
    ) -> Result<TraceSpan, StatusApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let delivered = self.send(endpoint, build).await?;
        let body = delivered
            .response
            .text()
            .await
            .map_err(|e| StatusApiError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;
        parse_trace_span(endpoint, &body)
    }
}

/// Both ids must be present. The service has returned them as strings and
/// as numbers; either is accepted.
pub(crate) fn parse_trace_span(endpoint: &str, body: &str) -> Result<TraceSpan, StatusApiError> {
    let value: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    match (id_field(&value, "trace_id"), id_field(&value, "span_id")) {
        (Some(trace_id), Some(span_id)) => Ok(TraceSpan { trace_id, span_id }),
        _ => Err(StatusApiError::InvalidApiResponse {
            endpoint: endpoint.to_string(),
            body: body.to_string(),
        }),
    }
}

fn id_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
