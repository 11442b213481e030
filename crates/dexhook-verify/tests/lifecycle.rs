//! Post-create and post-finish flows against a wiremock status service.

use std::time::Duration;

use dexhook_core::{Metadata, ResolveError};
use dexhook_status_client::{RetryPolicy, StatusApiConfig, StatusApiError, StatusClient};
use dexhook_verify::{post_create, post_finish, LifecycleError};
use serde_json::json;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn status_client(server: &MockServer) -> StatusClient {
    let mut config = StatusApiConfig::local_mock(&server.uri()).unwrap();
    config.retry = RetryPolicy::new(2, Duration::from_millis(5));
    StatusClient::new(config).unwrap()
}

fn md(pairs: &[(&str, &str)]) -> Metadata {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn post_create_opens_trace_and_upload_span() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/trace"))
        .and(query_param("uploadId", "tus-42"))
        .and(query_param("destinationId", "celr"))
        .and(query_param("eventType", "hl7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t-42", "span_id": "root"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/trace/startSpan/t-42/root"))
        .and(query_param("stageName", "dex-upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t-42", "span_id": "up"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let metadata = md(&[
        ("version", "2.0"),
        ("data_stream_id", "celr"),
        ("data_stream_route", "hl7"),
    ]);
    let context = post_create(&status_client(&server), "tus-42", &metadata)
        .await
        .unwrap();

    assert_eq!(context.upload_id, "tus-42");
    assert_eq!(context.trace_id, "t-42");
    assert_eq!(context.parent_span_id, "root");
}

#[tokio::test]
async fn post_create_rejects_unresolvable_metadata_before_any_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = post_create(&status_client(&server), "tus-1", &md(&[("meta_ext_event", "ri")]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Resolve(ResolveError::MissingFields { .. })
    ));
}

#[tokio::test]
async fn post_finish_stops_upload_span() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trace/uploadId/tus-7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t-7", "span_id": "root"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/trace/span"))
        .and(query_param("uploadId", "tus-7"))
        .and(query_param("stageName", "dex-upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t-7", "span_id": "up"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/trace/stopSpan/t-7/up"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let span = post_finish(&status_client(&server), "tus-7").await.unwrap();
    assert_eq!(span.span_id, "up");
}

#[tokio::test]
async fn post_finish_tolerates_failed_trace_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trace/uploadId/tus-8"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/trace/span"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"trace_id": "t-8", "span_id": "up"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/trace/stopSpan/t-8/up"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    post_finish(&status_client(&server), "tus-8").await.unwrap();
}

#[tokio::test]
async fn post_finish_fails_when_span_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "not found"})))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = post_finish(&status_client(&server), "tus-9").await.unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::Status(StatusApiError::InvalidApiResponse { .. })
    ));
}
