//! HTTP-level tests for the webhook intake route.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use hookwatch_adapter_memory::MemoryStorage;
use hookwatch_core::{sign, EventIngestor, Provider, WebhookSource, WebhookStorage};
use hookwatch_server::{webhook_routes, AppState};

const SECRET: &str = "whsec_test";
const PAYLOAD: &str = "{\"type\":\"ping\"}";

async fn test_app() -> (Arc<MemoryStorage>, Router) {
    let storage = Arc::new(MemoryStorage::new());

    storage
        .save_source(&WebhookSource::new("github", "GitHub", SECRET))
        .await
        .unwrap();
    storage
        .save_source(&WebhookSource::new("shopify", "Shopify", SECRET))
        .await
        .unwrap();
    storage
        .save_source(&WebhookSource::new("paused", "Paused", SECRET).disabled())
        .await
        .unwrap();

    let state = AppState {
        storage: storage.clone(),
        ingestor: Arc::new(EventIngestor::new(storage.clone())),
    };

    let app = webhook_routes(state)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4242))));

    (storage, app)
}

fn post(uri: &str, headers: &[(&str, &str)], body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn accepted_delivery_returns_200_with_event_id() {
    let (storage, app) = test_app().await;
    let signature = sign(Provider::Github, PAYLOAD.as_bytes(), SECRET);

    let response = app
        .oneshot(post(
            "/api/webhooks/github",
            &[
                ("X-Hub-Signature-256", signature.as_str()),
                ("X-GitHub-Event", "push"),
            ],
            PAYLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "accepted");

    let event_id = body["id"].as_str().unwrap();
    let event = storage.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.event_type, "push");
    assert_eq!(event.ip_address, "127.0.0.1");
}

#[tokio::test]
async fn bad_signature_returns_401_without_leaking_it() {
    let (storage, app) = test_app().await;

    let response = app
        .oneshot(post(
            "/api/webhooks/github",
            &[("X-Hub-Signature-256", "sha256=deadbeef")],
            PAYLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Signature validation failed");
    assert_eq!(body["details"]["signature"], "Signature validation failed");
    assert!(!body.to_string().contains("deadbeef"));
    assert!(!body.to_string().contains(SECRET));

    assert_eq!(storage.event_count().await, 0);
}

#[tokio::test]
async fn disabled_source_returns_403() {
    let (_storage, app) = test_app().await;
    let signature = sign(Provider::Github, PAYLOAD.as_bytes(), SECRET);

    let response = app
        .oneshot(post(
            "/api/webhooks/paused",
            &[("X-Hub-Signature-256", signature.as_str())],
            PAYLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Webhook source is disabled");
    assert_eq!(body["source"], "paused");
}

#[tokio::test]
async fn unknown_slug_returns_404() {
    let (_storage, app) = test_app().await;

    let response = app
        .oneshot(post("/api/webhooks/nope", &[], PAYLOAD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_provider_returns_401() {
    let (_storage, app) = test_app().await;

    let response = app
        .oneshot(post(
            "/api/webhooks/shopify",
            &[("X-Shopify-Hmac-Sha256", "deadbeef")],
            PAYLOAD,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(
        body["details"]["provider"],
        "No verification scheme defined for this provider"
    );
}

#[tokio::test]
async fn malformed_json_returns_422() {
    let (_storage, app) = test_app().await;
    let body = "{not json";
    let signature = sign(Provider::Github, body.as_bytes(), SECRET);

    let response = app
        .oneshot(post(
            "/api/webhooks/github",
            &[("X-Hub-Signature-256", signature.as_str())],
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_body_returns_400() {
    let (_storage, app) = test_app().await;

    let response = app
        .oneshot(post("/api/webhooks/github", &[], ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
