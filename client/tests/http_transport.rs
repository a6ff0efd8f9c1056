//! End-to-end coverage for the reqwest transport against a loopback backend.

mod support;

use std::sync::Arc;
use std::time::Duration;

use client::domain::ports::{
    ApiRequest, ApiTransport, ApiTransportError, DurableStorage, InMemoryStorage, TOKEN_KEY,
};
use client::outbound::http::{DEFAULT_TIMEOUT, HttpTransport};
use rstest::rstest;
use serde_json::{Value, json};
use url::Url;

use support::{StubBackend, StubResponse, unused_origin};

fn transport(origin: &Url, storage: Arc<dyn DurableStorage>) -> HttpTransport {
    HttpTransport::new(origin, DEFAULT_TIMEOUT, storage).expect("build transport")
}

fn signed_in() -> Arc<dyn DurableStorage> {
    Arc::new(InMemoryStorage::with_entries([(TOKEN_KEY, "abc")]))
}

#[tokio::test]
async fn sends_json_body_with_bearer_token() {
    let backend = StubBackend::start([StubResponse::ok(json!({"id": 5}))]).await;
    let transport = transport(&backend.origin(), signed_in());

    let data = transport
        .call(
            &ApiRequest::post("/cart/add").with_body(json!({"product_id": 9, "quantity": 2})),
        )
        .await
        .expect("success");

    assert_eq!(data, json!({"id": 5}));
    let request = backend.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.target, "/api/v1/cart/add");
    assert_eq!(request.header("authorization"), Some("Bearer abc"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.json(), json!({"product_id": 9, "quantity": 2}));
}

#[tokio::test]
async fn encodes_query_parameters() {
    let backend = StubBackend::start([StubResponse::ok(json!({"list": [], "total": 0}))]).await;
    let transport = transport(&backend.origin(), signed_in());

    transport
        .call(&ApiRequest::get("/products").with_query(vec![
            ("page".to_owned(), "1".to_owned()),
            ("name".to_owned(), "green tea".to_owned()),
        ]))
        .await
        .expect("success");

    let request = backend.single_request();
    assert_eq!(request.method, "GET");
    assert_eq!(request.target, "/api/v1/products?page=1&name=green+tea");
    assert!(request.body.is_empty());
}

#[tokio::test]
async fn omits_credentials_without_token() {
    let backend = StubBackend::start([StubResponse::ok(Value::Null)]).await;
    let transport = transport(&backend.origin(), Arc::new(InMemoryStorage::default()));

    transport
        .call(&ApiRequest::get("/notice/list"))
        .await
        .expect("success");

    assert_eq!(backend.single_request().header("authorization"), None);
}

#[tokio::test]
async fn token_is_read_per_request() {
    let backend = StubBackend::start([]).await;
    let storage: Arc<dyn DurableStorage> = Arc::new(InMemoryStorage::default());
    let transport = transport(&backend.origin(), storage.clone());

    transport.call(&ApiRequest::get("/products")).await.expect("first");
    storage.set(TOKEN_KEY, "fresh").expect("store token");
    transport.call(&ApiRequest::get("/products")).await.expect("second");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(requests[1].header("authorization"), Some("Bearer fresh"));
}

#[rstest]
#[case::application(
    StubResponse::envelope(500, Value::Null, "余额不足"),
    ApiTransportError::application(500, "余额不足")
)]
#[case::envelope_401(
    StubResponse::envelope(401, Value::Null, "expired"),
    ApiTransportError::session_invalidated("expired")
)]
#[case::http_401(
    StubResponse::raw(401, ""),
    ApiTransportError::session_invalidated("session expired")
)]
#[case::http_500(
    StubResponse::raw(500, r#"{"code":500,"msg":"db down"}"#),
    ApiTransportError::status(500_u16, "db down")
)]
#[tokio::test]
async fn rejections_map_to_typed_errors(
    #[case] response: StubResponse,
    #[case] expected: ApiTransportError,
) {
    let backend = StubBackend::start([response]).await;
    let storage = signed_in();
    let transport = transport(&backend.origin(), storage.clone());

    let error = transport
        .call(&ApiRequest::get("/user/info"))
        .await
        .expect_err("rejected");

    assert_eq!(error, expected);
    assert_eq!(
        storage.get(TOKEN_KEY).expect("read token"),
        Some("abc".to_owned()),
        "the adapter never touches the session"
    );
}

#[tokio::test]
async fn per_call_timeout_overrides_default() {
    let backend =
        StubBackend::start([StubResponse::ok(Value::Null).delayed(Duration::from_secs(2))]).await;
    let transport = transport(&backend.origin(), signed_in());

    let error = transport
        .call(&ApiRequest::post("/ai/chat").with_timeout(Duration::from_millis(100)))
        .await
        .expect_err("timed out");

    assert!(matches!(error, ApiTransportError::Timeout { .. }), "{error:?}");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let origin = unused_origin().await;
    let transport = transport(&origin, signed_in());

    let error = transport
        .call(&ApiRequest::get("/products"))
        .await
        .expect_err("unreachable");

    assert!(matches!(error, ApiTransportError::Transport { .. }), "{error:?}");
}
