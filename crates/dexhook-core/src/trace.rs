//! # Upload Trace Context
//!
//! Handles into the external processing-status service. A trace is opened
//! once per upload; child spans mark pipeline stages. The caller of the
//! status client owns these values; the client never caches them.

use serde::{Deserialize, Serialize};

/// A `(trace_id, span_id)` pair as returned by the status service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSpan {
    pub trace_id: String,
    pub span_id: String,
}

/// The trace an upload's stages hang off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTraceContext {
    pub upload_id: String,
    pub trace_id: String,
    /// Root span of the trace; stage spans are started beneath it.
    pub parent_span_id: String,
}

impl UploadTraceContext {
    /// Build the context from the root span returned when the trace was created.
    pub fn new(upload_id: impl Into<String>, root: TraceSpan) -> Self {
        Self {
            upload_id: upload_id.into(),
            trace_id: root.trace_id,
            parent_span_id: root.span_id,
        }
    }
}
