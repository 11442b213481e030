//! # Validation Orchestrator
//!
//! `resolve → fetch schema → validate` for one upload's metadata. The first
//! stage to fail decides the [`VerifyError`]; within validation every issue
//! is collected before deciding.
//!
//! A rejection is reported to the status service as a fresh trace with a
//! `metadata-verify` span carrying a [`MetadataVerifyReport`]. Reporting is
//! best effort: its failures are logged and the rejection is returned as is.

use dexhook_core::{resolve, Metadata, MetadataVersion, ValidationIssue};
use dexhook_schema::{
    extract_filename, validate, verify_filename, FilenameError, SchemaKey, SchemaStore,
    SchemaStoreError, FILENAME_FIELDS,
};
use dexhook_status_client::{StatusApiError, StatusClient};

use crate::error::VerifyError;
use crate::report::MetadataVerifyReport;

/// Stage name of the span a rejection is reported under.
pub const VERIFY_STAGE: &str = "metadata-verify";

/// Metadata field that pins a definition inside a multi-version
/// upload-config document.
pub const SCHEMA_VERSION_FIELD: &str = "schema_version";

/// Stand-in for an id the metadata did not supply.
pub const NOT_PROVIDED: &str = "not provided";

/// Verifies upload metadata against the upload-config schemas in `S`.
#[derive(Debug)]
pub struct ValidationOrchestrator<S> {
    store: S,
    reporter: Option<StatusClient>,
}

impl<S: SchemaStore> ValidationOrchestrator<S> {
    /// `reporter` is `None` when no status service is configured; rejections
    /// are then only logged.
    pub fn new(store: S, reporter: Option<StatusClient>) -> Self {
        Self { store, reporter }
    }

    /// Accept or reject `metadata`. On rejection the failure is reported
    /// under `upload_id` before the error is returned.
    pub async fn verify(&self, upload_id: &str, metadata: &Metadata) -> Result<(), VerifyError> {
        match self.check(metadata).await {
            Ok(()) => {
                tracing::info!(upload_id, "metadata accepted");
                Ok(())
            }
            Err(error) => {
                tracing::info!(upload_id, %error, "metadata rejected");
                self.report_rejection(upload_id, metadata, &error).await;
                Err(error)
            }
        }
    }

    async fn check(&self, metadata: &Metadata) -> Result<(), VerifyError> {
        let resolved = resolve(metadata)?;
        let key = SchemaKey::for_upload(&resolved);
        tracing::debug!(%key, version = %resolved.version, "fetching upload config");

        let config = self.store.fetch(&key).await?;
        let definition = config
            .select(metadata.get(SCHEMA_VERSION_FIELD))
            .map_err(|cause| SchemaStoreError::not_found(&key, cause))?;

        let mut issues = validate(metadata, definition);
        match extract_filename(metadata).and_then(verify_filename) {
            Ok(()) => {}
            // Already reported by the schema as a missing required field.
            Err(FilenameError::NoFilename) if flags_missing_filename(&issues) => {}
            Err(e) => issues.push(e.into()),
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::ValidationFailed { issues })
        }
    }

    async fn report_rejection(&self, upload_id: &str, metadata: &Metadata, error: &VerifyError) {
        let Some(client) = &self.reporter else {
            tracing::warn!(upload_id, "status reporting disabled; rejection not reported");
            return;
        };

        let report = MetadataVerifyReport::new(metadata, error);
        let [destination_id, event_type] = report_ids(metadata);
        if let Err(e) = submit(client, upload_id, destination_id, event_type, &report).await {
            tracing::error!(upload_id, error = %e, "failed to report metadata rejection");
        }
    }
}

fn flags_missing_filename(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|issue| {
        matches!(issue, ValidationIssue::MissingRequired { field, .. }
            if FILENAME_FIELDS.contains(&field.as_str()))
    })
}

/// The use-case ids for the report trace. Ids that cannot be read from the
/// metadata are [`NOT_PROVIDED`].
fn report_ids(metadata: &Metadata) -> [&str; 2] {
    match MetadataVersion::from_metadata(metadata) {
        Ok(version) => version
            .id_fields()
            .map(|field| metadata.get(field).unwrap_or(NOT_PROVIDED)),
        Err(_) => [NOT_PROVIDED, NOT_PROVIDED],
    }
}

/// Open trace, start span, attach report, stop span. The span is stopped
/// even when the report could not be attached.
async fn submit(
    client: &StatusClient,
    upload_id: &str,
    destination_id: &str,
    event_type: &str,
    report: &MetadataVerifyReport,
) -> Result<(), StatusApiError> {
    let root = client
        .traces()
        .create_upload_trace(upload_id, destination_id, event_type)
        .await?;
    let span = client
        .traces()
        .start_span_for_trace(&root.trace_id, &root.span_id, VERIFY_STAGE)
        .await?;
    tracing::debug!(
        upload_id,
        trace_id = %span.trace_id,
        span_id = %span.span_id,
        "started {VERIFY_STAGE} span"
    );

    let reported = client
        .reports()
        .create_report(upload_id, destination_id, event_type, VERIFY_STAGE, report)
        .await;
    let stopped = client
        .traces()
        .stop_span_for_trace(&span.trace_id, &span.span_id)
        .await;

    reported.and(stopped)
}
