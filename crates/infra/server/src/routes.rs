//! Route mounting and response mapping for webhook intake.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Path, State};
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use hookwatch_core::{EventIngestor, InboundDelivery, WebhookError, WebhookStorage};

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn WebhookStorage>,
    pub ingestor: Arc<EventIngestor>,
}

/// Creates an Axum router with the webhook intake route.
///
/// # Example
///
/// ```rust,ignore
/// let app = webhook_routes(AppState { storage, ingestor });
/// axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
/// ```
pub fn webhook_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/webhooks/{slug}", post(receive_webhook))
        .with_state(state)
}

async fn receive_webhook(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let source = match state.storage.get_source_by_slug(&slug).await {
        Ok(Some(source)) => source,
        Ok(None) => return error_response(&WebhookError::SourceNotFound { slug }),
        Err(err) => return error_response(&err),
    };

    let delivery = InboundDelivery::new(
        body.to_vec(),
        header_pairs(&headers),
        addr.ip().to_string(),
    );

    match state.ingestor.ingest(&source, &delivery).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(json!({
                "status": "accepted",
                "id": receipt.event_id,
                "message": "Webhook received and queued for processing",
            })),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Flattens an HTTP header map into the plain pairs the core consumes.
/// Non-UTF-8 header values are dropped.
fn header_pairs(headers: &HeaderMap) -> std::collections::HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

fn error_response(err: &WebhookError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = match err {
        WebhookError::SourceDisabled { slug } => json!({
            "error": "Webhook source is disabled",
            "source": slug,
        }),
        _ => json!({
            "error": err.to_string(),
            "details": error_details(err),
        }),
    };

    (status, Json(body)).into_response()
}

/// Stable machine-readable detail per rejection kind. Never echoes the
/// received signature or the secret.
fn error_details(err: &WebhookError) -> Value {
    let (key, message) = match err {
        WebhookError::SourceNotFound { .. } => ("source", "No webhook source registered for this slug"),
        WebhookError::SourceDisabled { .. } => ("source", "Webhook source is disabled"),
        WebhookError::MissingPayload => ("payload", "Request body is empty"),
        WebhookError::InvalidPayloadEncoding { .. } => ("payload", "Request body is not valid JSON"),
        WebhookError::UnsupportedProvider { .. } => {
            ("provider", "No verification scheme defined for this provider")
        }
        WebhookError::MissingSignatureHeader { .. } => {
            ("signature", "Expected signature header is missing")
        }
        WebhookError::SignatureMismatch => ("signature", "Signature validation failed"),
        WebhookError::StorageFailure { .. } => ("storage", "Event could not be persisted"),
    };

    let mut details = serde_json::Map::new();
    details.insert(key.to_string(), Value::String(message.to_string()));
    Value::Object(details)
}
