//! Trace and span operations.
//!
//! | Method | Path | Returns |
//! |--------|------|---------|
//! | POST | `/api/trace?uploadId&destinationId&eventType` | root `{trace_id, span_id}` |
//! | PUT  | `/api/trace/startSpan/{trace_id}/{parent_span_id}?stageName` | child `{trace_id, span_id}` |
//! | PUT  | `/api/trace/stopSpan/{trace_id}/{span_id}` | nothing |
//! | GET  | `/api/trace/uploadId/{upload_id}` | root `{trace_id, span_id}` |
//! | GET  | `/api/trace/span?uploadId&stageName` | stage `{trace_id, span_id}` |
//!
//! Creation calls are not deduplicated. A retried `POST /api/trace` may
//! leave the service with two traces for one upload.

use dexhook_core::TraceSpan;

use crate::error::StatusApiError;
use crate::transport::Transport;

/// Client for `/api/trace`.
#[derive(Debug, Clone)]
pub struct TraceClient {
    transport: Transport,
}

impl TraceClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Open a trace for an upload. Returns the root span.
    pub async fn create_upload_trace(
        &self,
        upload_id: &str,
        destination_id: &str,
        event_type: &str,
    ) -> Result<TraceSpan, StatusApiError> {
        let endpoint = "POST /api/trace";
        let url = self.transport.url(
            endpoint,
            &["api", "trace"],
            &[
                ("uploadId", upload_id),
                ("destinationId", destination_id),
                ("eventType", event_type),
            ],
        )?;

        let root = self
            .transport
            .send_for_span(endpoint, |http| http.post(url.clone()))
            .await?;
        tracing::debug!(
            upload_id,
            trace_id = %root.trace_id,
            span_id = %root.span_id,
            "created upload trace"
        );
        Ok(root)
    }

    /// Start a stage span beneath `parent_span_id`.
    pub async fn start_span_for_trace(
        &self,
        trace_id: &str,
        parent_span_id: &str,
        stage_name: &str,
    ) -> Result<TraceSpan, StatusApiError> {
        let endpoint = "PUT /api/trace/startSpan";
        let url = self.transport.url(
            endpoint,
            &["api", "trace", "startSpan", trace_id, parent_span_id],
            &[("stageName", stage_name)],
        )?;

        let span = self
            .transport
            .send_for_span(endpoint, |http| http.put(url.clone()))
            .await?;
        tracing::debug!(
            trace_id,
            parent_span_id,
            span_id = %span.span_id,
            stage_name,
            "started span"
        );
        Ok(span)
    }

    /// Stop a span. The response body is ignored.
    pub async fn stop_span_for_trace(
        &self,
        trace_id: &str,
        span_id: &str,
    ) -> Result<(), StatusApiError> {
        let endpoint = "PUT /api/trace/stopSpan";
        let url = self
            .transport
            .url(endpoint, &["api", "trace", "stopSpan", trace_id, span_id], &[])?;

        self.transport
            .send(endpoint, |http| http.put(url.clone()))
            .await?;
        tracing::debug!(trace_id, span_id, "stopped span");
        Ok(())
    }

    /// Look up the trace opened for an upload.
    pub async fn get_trace_by_upload_id(&self, upload_id: &str) -> Result<TraceSpan, StatusApiError> {
        let endpoint = "GET /api/trace/uploadId";
        let url = self
            .transport
            .url(endpoint, &["api", "trace", "uploadId", upload_id], &[])?;

        self.transport
            .send_for_span(endpoint, |http| http.get(url.clone()))
            .await
    }

    /// Look up the span an upload has for `stage_name`.
    pub async fn get_span_by_upload_id(
        &self,
        upload_id: &str,
        stage_name: &str,
    ) -> Result<TraceSpan, StatusApiError> {
        let endpoint = "GET /api/trace/span";
        let url = self.transport.url(
            endpoint,
            &["api", "trace", "span"],
            &[("uploadId", upload_id), ("stageName", stage_name)],
        )?;

        self.transport
            .send_for_span(endpoint, |http| http.get(url.clone()))
            .await
    }
}
