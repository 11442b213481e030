//! # `dexhook post-finish`
//!
//! Runs once all of an upload's bytes have arrived: stops the upload's
//! `dex-upload` span.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use dexhook_status_client::StatusClient;
use dexhook_verify::post_finish;

use crate::config::required_status_client;
use crate::output::report_failure;
use crate::EXIT_OK;

/// Arguments for `dexhook post-finish`.
#[derive(Args, Debug)]
pub struct PostFinishArgs {
    /// Upload id assigned by the upload server.
    #[arg(short = 'i', long)]
    pub id: String,
}

pub async fn run_post_finish(args: &PostFinishArgs) -> Result<u8> {
    let client = required_status_client()?;
    stop_upload_span(args, &client, &mut std::io::stdout()).await
}

pub async fn stop_upload_span<W: Write>(
    args: &PostFinishArgs,
    client: &StatusClient,
    out: &mut W,
) -> Result<u8> {
    match post_finish(client, &args.id).await {
        Ok(_) => Ok(EXIT_OK),
        Err(e) => {
            tracing::error!(upload_id = %args.id, error = %e, "post-finish failed");
            report_failure(out, Some(&args.id), e.to_string())
        }
    }
}
