//! # `dexhook post-create`
//!
//! Runs once the upload server has created the upload: opens the upload's
//! status trace and starts its `dex-upload` span.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use dexhook_core::Metadata;
use dexhook_status_client::StatusClient;
use dexhook_verify::post_create;

use crate::config::required_status_client;
use crate::output::report_failure;
use crate::EXIT_OK;

/// Arguments for `dexhook post-create`.
#[derive(Args, Debug)]
pub struct PostCreateArgs {
    /// Upload id assigned by the upload server.
    #[arg(short = 'i', long)]
    pub id: String,

    /// Upload metadata as a JSON object.
    #[arg(short, long)]
    pub metadata: String,
}

pub async fn run_post_create(args: &PostCreateArgs) -> Result<u8> {
    let client = required_status_client()?;
    start_upload_trace(args, &client, &mut std::io::stdout()).await
}

pub async fn start_upload_trace<W: Write>(
    args: &PostCreateArgs,
    client: &StatusClient,
    out: &mut W,
) -> Result<u8> {
    let metadata = match Metadata::from_json(&args.metadata) {
        Ok(metadata) => metadata,
        Err(e) => return report_failure(out, Some(&args.id), format!("Malformed metadata: {e}")),
    };

    match post_create(client, &args.id, &metadata).await {
        Ok(context) => {
            tracing::debug!(upload_id = %context.upload_id, trace_id = %context.trace_id, "post-create done");
            Ok(EXIT_OK)
        }
        Err(e) => {
            tracing::error!(upload_id = %args.id, error = %e, "post-create failed");
            report_failure(out, Some(&args.id), e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EXIT_FAILED;
    use dexhook_status_client::StatusApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn opens_trace_and_span() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/trace"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t", "span_id": "r"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/trace/startSpan/t/r"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t", "span_id": "s"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = StatusClient::new(StatusApiConfig::local_mock(&server.uri()).unwrap()).unwrap();
        let args = PostCreateArgs {
            id: "tus-1".into(),
            metadata: r#"{"meta_destination_id":"ndlp","meta_ext_event":"ri"}"#.into(),
        };
        let mut out = Vec::new();
        assert_eq!(start_upload_trace(&args, &client, &mut out).await.unwrap(), EXIT_OK);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_trace_response_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t"})))
            .mount(&server)
            .await;

        let client = StatusClient::new(StatusApiConfig::local_mock(&server.uri()).unwrap()).unwrap();
        let args = PostCreateArgs {
            id: "tus-2".into(),
            metadata: r#"{"meta_destination_id":"ndlp","meta_ext_event":"ri"}"#.into(),
        };
        let mut out = Vec::new();
        assert_eq!(start_upload_trace(&args, &client, &mut out).await.unwrap(), EXIT_FAILED);
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["upload_id"], "tus-2");
        assert!(value["message"].as_str().unwrap().contains("Invalid PS API response"));
    }
}
