//! The webhook receiver HTTP surface.
//!
//! A single axum route accepts Clerk's signed deliveries. The receiver is
//! the one boundary that converts pipeline errors into HTTP status codes:
//!
//! - `400` — missing signature headers or a malformed JSON body
//! - `401` — signature verification failure
//! - `200` — handler completed, or the event type is not consumed here
//! - `500` — handler failure, with the error message in the body for
//!   operator diagnosis (Clerk will redeliver)

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use cov_db::CovDb;
use cov_db::repos::SyncOutcome;

use crate::event::{EventEnvelope, EventKind};
use crate::handlers::{Dispatched, dispatch};
use crate::signature;

/// Shared state for the receiver routes.
///
/// The database handle is constructed once at startup with the elevated
/// service credential — the sync pipeline runs outside any user session —
/// and passed in explicitly rather than living in a module-level singleton.
pub struct AppState {
    pub db: CovDb,
    pub webhook_secret: String,
}

/// Build the receiver router.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/clerk", post(receive_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (Some(id), Some(timestamp), Some(sig)) = (
        header_str(&headers, "svix-id"),
        header_str(&headers, "svix-timestamp"),
        header_str(&headers, "svix-signature"),
    ) else {
        return (StatusCode::BAD_REQUEST, "missing Svix signature headers").into_response();
    };

    if let Err(error) = signature::verify(&state.webhook_secret, id, timestamp, sig, &body) {
        tracing::warn!(svix_id = id, %error, "rejected webhook delivery");
        return (StatusCode::UNAUTHORIZED, error.to_string()).into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(error) => {
            tracing::warn!(svix_id = id, %error, "malformed webhook body");
            return (StatusCode::BAD_REQUEST, format!("malformed event body: {error}"))
                .into_response();
        }
    };

    let kind = EventKind::from_type(&envelope.event_type);
    let result = dispatch(&state.db, kind, &envelope.event_type, &envelope.data).await;

    let (outcome, detail) = match &result {
        Ok(Dispatched::Handled) => (SyncOutcome::Processed, None),
        Ok(Dispatched::Ignored) => (SyncOutcome::Ignored, None),
        Err(error) => (SyncOutcome::Failed, Some(error.to_string())),
    };
    if let Err(error) = state
        .db
        .record_sync_event(Some(id), &envelope.event_type, outcome, detail.as_deref())
        .await
    {
        // The log is observational; a failure to record never fails the event.
        tracing::warn!(svix_id = id, %error, "failed to record sync event");
    }

    match result {
        Ok(_) => (StatusCode::OK, "Webhook processed successfully").into_response(),
        Err(error) => {
            tracing::error!(
                svix_id = id,
                event_type = %envelope.event_type,
                %error,
                "webhook handler failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
