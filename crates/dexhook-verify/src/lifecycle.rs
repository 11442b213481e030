//! Post-create and post-finish flows: the `dex-upload` span brackets the
//! transfer of an upload's bytes.

use dexhook_core::{resolve, Metadata, TraceSpan, UploadTraceContext};
use dexhook_status_client::StatusClient;

use crate::error::LifecycleError;

/// Stage name of the span covering the upload itself.
pub const UPLOAD_STAGE: &str = "dex-upload";

/// Open the upload's trace and start its `dex-upload` span.
pub async fn post_create(
    client: &StatusClient,
    upload_id: &str,
    metadata: &Metadata,
) -> Result<UploadTraceContext, LifecycleError> {
    let resolved = resolve(metadata)?;

    let root = client
        .traces()
        .create_upload_trace(upload_id, &resolved.use_case, &resolved.use_case_category)
        .await?;
    let context = UploadTraceContext::new(upload_id, root);

    let span = client
        .traces()
        .start_span_for_trace(&context.trace_id, &context.parent_span_id, UPLOAD_STAGE)
        .await?;
    tracing::info!(
        upload_id,
        trace_id = %context.trace_id,
        parent_span_id = %context.parent_span_id,
        span_id = %span.span_id,
        "started {UPLOAD_STAGE} span"
    );

    Ok(context)
}

/// Stop the upload's `dex-upload` span. Returns the span that was stopped.
pub async fn post_finish(client: &StatusClient, upload_id: &str) -> Result<TraceSpan, LifecycleError> {
    match client.traces().get_trace_by_upload_id(upload_id).await {
        Ok(root) => tracing::debug!(
            upload_id,
            trace_id = %root.trace_id,
            span_id = %root.span_id,
            "found upload trace"
        ),
        Err(e) => tracing::warn!(upload_id, error = %e, "upload trace lookup failed"),
    }

    let span = client
        .traces()
        .get_span_by_upload_id(upload_id, UPLOAD_STAGE)
        .await?;
    client
        .traces()
        .stop_span_for_trace(&span.trace_id, &span.span_id)
        .await?;
    tracing::info!(
        upload_id,
        trace_id = %span.trace_id,
        span_id = %span.span_id,
        "stopped {UPLOAD_STAGE} span"
    );

    Ok(span)
}
