use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use stayline_auth::prelude::*;
use stayline_gateway::config::GatewayConfig;
use stayline_gateway::routes::router;
use stayline_gateway::state::AppState;
use stayline_net::prelude::*;
use stayline_schema::prelude::*;

enum MockReply {
    Json(Value),
    Status(u16),
}

struct MockInvoker {
    calls: AtomicUsize,
    last: Mutex<Option<BackendRequest>>,
    reply: MockReply,
}

impl MockInvoker {
    fn json(reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            reply: MockReply::Json(reply),
        })
    }

    fn status(code: u16) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
            reply: MockReply::Status(code),
        })
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<BackendRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendInvoker for MockInvoker {
    async fn invoke(&self, request: BackendRequest) -> Result<BackendResponse, NetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);
        match &self.reply {
            MockReply::Json(body) => Ok(BackendResponse {
                status: StatusCode::OK,
                body: body.clone(),
            }),
            MockReply::Status(code) => Err(NetError::upstream_status(
                StatusCode::from_u16(*code).unwrap(),
                "mock backend failure",
            )),
        }
    }
}

struct MockTokens {
    calls: AtomicUsize,
}

impl MockTokens {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityTokenProvider for MockTokens {
    async fn token(&self, _audience: &str) -> Result<BearerToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BearerToken::new("test-token"))
    }
}

fn test_config(host: Option<&str>) -> GatewayConfig {
    let backend = match host {
        Some(host) => json!({"host": host}),
        None => json!({}),
    };
    serde_json::from_value(json!({"backend": backend})).unwrap()
}

fn reservation_schema() -> FieldSchema {
    FieldSchema::new(vec![
        FieldSpec {
            canonical: "conf".into(),
            display: "Confirmation".into(),
            field_type: FieldType::String,
        },
        FieldSpec {
            canonical: "doorAccess".into(),
            display: "Door Access".into(),
            field_type: FieldType::Date,
        },
        FieldSpec {
            canonical: "guestCount".into(),
            display: "Guests".into(),
            field_type: FieldType::Number,
        },
    ])
    .unwrap()
}

fn test_state(
    host: Option<&str>,
    tokens: Arc<MockTokens>,
    invoker: Arc<MockInvoker>,
) -> AppState {
    AppState::with_parts(
        test_config(host),
        reservation_schema(),
        "secret".into(),
        tokens,
        invoker,
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-apikey", key);
    }
    builder.body(Body::empty()).unwrap()
}

fn put(uri: &str, api_key: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-apikey", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_needs_no_api_key() {
    let app = router(test_state(
        Some("bookings.internal"),
        MockTokens::new(),
        MockInvoker::json(json!({})),
    ));

    let response = app.oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn missing_api_key_is_rejected_without_touching_the_backend() {
    let tokens = MockTokens::new();
    let invoker = MockInvoker::json(json!({}));
    let app = router(test_state(Some("bookings.internal"), tokens.clone(), invoker.clone()));

    let response = app.oneshot(get("/o/org-1/cleanings", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(tokens.count(), 0);
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn wrong_api_key_is_rejected_on_reads_and_writes() {
    let tokens = MockTokens::new();
    let invoker = MockInvoker::json(json!({}));
    let state = test_state(Some("bookings.internal"), tokens.clone(), invoker.clone());

    let response = router(state.clone())
        .oneshot(get("/o/org-1/reservations", Some("nope")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router(state)
        .oneshot(put(
            "/o/org-1/reservations/CONF1",
            Some("nope"),
            &json!({"Door Access": "02/01/2024 09:00:00 AM"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(tokens.count(), 0);
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn unconfigured_backend_host_fails_before_any_outbound_call() {
    let tokens = MockTokens::new();
    let invoker = MockInvoker::json(json!({}));
    let app = router(test_state(None, tokens.clone(), invoker.clone()));

    let response = app
        .oneshot(get("/o/org-1/cleanings", Some("secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(tokens.count(), 0);
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn cleanings_are_returned_under_backend_display_names() {
    let tokens = MockTokens::new();
    let invoker = MockInvoker::json(json!({
        "records": [{"a": 1, "b": 2}],
        "fields": {"a": {"display": "A"}}
    }));
    let app = router(test_state(Some("bookings.internal"), tokens.clone(), invoker.clone()));

    let response = app
        .oneshot(get("/o/org-1/cleanings", Some("secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"cleanings": [{"A": 1, "b": 2}]}));

    let request = invoker.last_request().expect("one backend call");
    assert_eq!(request.method, axum::http::Method::GET);
    assert_eq!(
        request.url.as_str(),
        "https://bookings.internal/o/org-1/cleanings"
    );
    assert_eq!(request.bearer, "test-token");
    assert_eq!(tokens.count(), 1);
}

#[tokio::test]
async fn reservations_respond_under_their_own_key() {
    let invoker = MockInvoker::json(json!({"records": [], "fields": {}}));
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker));

    let response = app
        .oneshot(get("/o/org-9/reservations", Some("secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"reservations": []}));
}

#[tokio::test]
async fn update_decodes_fields_and_posts_the_event_envelope() {
    let invoker = MockInvoker::json(json!({"ok": true}));
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker.clone()));

    let response = app
        .oneshot(put(
            "/o/org-1/reservations/CONF1",
            Some("secret"),
            &json!({
                "Door Access": "02/01/2024 09:00:00 AM",
                "Guests": "4",
                "Confirmation": "OTHER",
                "Unmapped Column": "ignored"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let request = invoker.last_request().expect("one backend call");
    assert_eq!(request.method, axum::http::Method::POST);
    assert_eq!(request.url.as_str(), "https://bookings.internal/events");
    // The confirmation from the path wins over any body value, and the
    // unmapped column never reaches the backend.
    assert_eq!(
        request.body.unwrap(),
        json!({
            "type": "update",
            "conf": "CONF1",
            "doorAccess": "2024-02-01",
            "guestCount": 4.0,
        })
    );
}

#[tokio::test]
async fn update_with_no_recognized_fields_is_a_400() {
    let tokens = MockTokens::new();
    let invoker = MockInvoker::json(json!({"ok": true}));
    let app = router(test_state(Some("bookings.internal"), tokens.clone(), invoker.clone()));

    let response = app
        .oneshot(put(
            "/o/org-1/reservations/CONF1",
            Some("secret"),
            &json!({"Unmapped Column": "x"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(tokens.count(), 0);
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn update_with_a_bad_date_names_the_field_and_skips_the_backend() {
    let invoker = MockInvoker::json(json!({"ok": true}));
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker.clone()));

    let response = app
        .oneshot(put(
            "/o/org-1/reservations/CONF1",
            Some("secret"),
            &json!({"Door Access": "not a date"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("Door Access"));
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn update_with_a_non_object_body_is_a_400() {
    let invoker = MockInvoker::json(json!({"ok": true}));
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker.clone()));

    let response = app
        .oneshot(put(
            "/o/org-1/reservations/CONF1",
            Some("secret"),
            &json!(["not", "an", "object"]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(invoker.count(), 0);
}

#[tokio::test]
async fn upstream_failures_surface_as_a_generic_500() {
    let invoker = MockInvoker::status(503);
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker));

    let response = app
        .oneshot(get("/o/org-1/cleanings", Some("secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "PROVIDER.UNAVAILABLE");
    assert!(!body["message"].as_str().unwrap().contains("mock backend failure"));
}

#[tokio::test]
async fn malformed_backend_field_map_is_a_500_not_a_panic() {
    let invoker = MockInvoker::json(json!({
        "records": [{"a": 1}],
        "fields": {
            "a": {"display": "Same"},
            "b": {"display": "Same"}
        }
    }));
    let app = router(test_state(Some("bookings.internal"), MockTokens::new(), invoker));

    let response = app
        .oneshot(get("/o/org-1/cleanings", Some("secret")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "PROVIDER.UNAVAILABLE");
}
