//! # `dexhook pre-create`
//!
//! Verifies upload metadata before the upload server accepts the upload.
//! A rejection is reported to the status service (when configured) and
//! printed as JSON; the exit status tells the server to refuse the upload.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use dexhook_core::Metadata;
use dexhook_schema::SchemaStore;
use dexhook_status_client::StatusClient;
use dexhook_verify::{generate_upload_id, ValidationOrchestrator};

use crate::config::{optional_status_client, SchemaSource};
use crate::output::report_failure;
use crate::EXIT_OK;

/// Arguments for `dexhook pre-create`.
#[derive(Args, Debug)]
pub struct PreCreateArgs {
    /// Upload metadata as a JSON object.
    #[arg(short, long)]
    pub metadata: String,

    /// Id to report a rejection under. A random UUID is used when absent.
    #[arg(short = 'i', long)]
    pub id: Option<String>,
}

/// Execute `pre-create` with configuration from the environment.
pub async fn run_pre_create(args: &PreCreateArgs) -> Result<u8> {
    let store = SchemaSource::from_env()?.into_store()?;
    let reporter = optional_status_client()?;
    verify_metadata(args, store, reporter, &mut std::io::stdout()).await
}

/// Verify `args.metadata` against `store`, writing any failure to `out`.
pub async fn verify_metadata<S, W>(
    args: &PreCreateArgs,
    store: S,
    reporter: Option<StatusClient>,
    out: &mut W,
) -> Result<u8>
where
    S: SchemaStore,
    W: Write,
{
    let upload_id = args.id.clone().unwrap_or_else(generate_upload_id);

    let metadata = match Metadata::from_json(&args.metadata) {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!(upload_id = %upload_id, error = %e, "malformed metadata");
            return report_failure(out, Some(&upload_id), format!("Malformed metadata: {e}"));
        }
    };

    let orchestrator = ValidationOrchestrator::new(store, reporter);
    match orchestrator.verify(&upload_id, &metadata).await {
        Ok(()) => Ok(EXIT_OK),
        Err(e) => report_failure(out, Some(&upload_id), e.to_string()),
    }
}
