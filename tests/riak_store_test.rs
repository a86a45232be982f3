//! Integration tests for [`RiakStore`] against a mocked Riak HTTP interface.

use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riak_reporter::{KeyValueStore, ReporterError, RiakStore};

/// A mock node that answers ping and bucket-props for `bucket`.
async fn riak_node(bucket: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/buckets/{bucket}/props")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"props": {"name": bucket, "n_val": 3}})),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn connect_resolves_bucket() {
    let server = riak_node("metrics").await;

    let store = RiakStore::with_base_url(&server.uri(), "metrics")
        .await
        .unwrap();
    assert_eq!(store.namespace(), "metrics");
    assert_eq!(store.bucket(), "metrics");
}

#[tokio::test]
async fn put_writes_json_under_key() {
    let server = riak_node("metrics").await;

    Mock::given(method("PUT"))
        .and(path("/buckets/metrics/keys/app.requests"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"count":201}"#))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = RiakStore::with_base_url(&server.uri(), "metrics")
        .await
        .unwrap();
    store.put("app.requests", r#"{"count":201}"#).await.unwrap();
}

#[tokio::test]
async fn rejected_put_is_a_storage_write_error() {
    let server = riak_node("metrics").await;

    Mock::given(method("PUT"))
        .and(path("/buckets/metrics/keys/app.requests"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let store = RiakStore::with_base_url(&server.uri(), "metrics")
        .await
        .unwrap();
    let err = store.put("app.requests", "{}").await.unwrap_err();

    match err {
        ReporterError::StorageWrite { key, message } => {
            assert_eq!(key, "app.requests");
            assert!(message.contains("503"));
            assert!(message.contains("overloaded"));
        }
        other => panic!("expected StorageWrite, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_ping_is_a_connection_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = RiakStore::with_base_url(&server.uri(), "metrics")
        .await
        .unwrap_err();
    assert!(matches!(err, ReporterError::Connection(_)));
}

#[tokio::test]
async fn unresolvable_bucket_is_a_connection_error() {
    let server = riak_node("metrics").await;

    let err = RiakStore::with_base_url(&server.uri(), "other")
        .await
        .unwrap_err();
    match err {
        ReporterError::Connection(message) => assert!(message.contains("other")),
        other => panic!("expected Connection, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_node_is_a_connection_error() {
    // Port 1 on loopback refuses connections.
    let err = RiakStore::connect("127.0.0.1", 1, "metrics")
        .await
        .unwrap_err();
    assert!(matches!(err, ReporterError::Connection(_)));
}
