//! End-to-end tests for the webhook receiver: signed HTTP request in,
//! mirrored rows out. Uses an in-memory database and `tower::ServiceExt`
//! to drive the router without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cov_db::CovDb;
use cov_sync::{AppState, router};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tower::ServiceExt; // for `oneshot`

const SECRET: &str = "whsec_dGVzdC1zaWduaW5nLWtleQ=="; // "test-signing-key"

async fn test_state() -> Arc<AppState> {
    let db = CovDb::open_local(":memory:").await.unwrap();
    Arc::new(AppState {
        db,
        webhook_secret: SECRET.to_string(),
    })
}

fn sign(id: &str, timestamp: &str, body: &str) -> String {
    let key = BASE64
        .decode(SECRET.strip_prefix("whsec_").unwrap())
        .unwrap();
    let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
    mac.update(format!("{id}.{timestamp}.{body}").as_bytes());
    format!("v1,{}", BASE64.encode(mac.finalize().into_bytes()))
}

fn signed_request(id: &str, event: &serde_json::Value) -> Request<Body> {
    let body = event.to_string();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign(id, &timestamp, &body);
    Request::builder()
        .uri("/webhooks/clerk")
        .method("POST")
        .header("content-type", "application/json")
        .header("svix-id", id)
        .header("svix-timestamp", timestamp)
        .header("svix-signature", signature)
        .body(Body::from(body))
        .unwrap()
}

fn user_created_event() -> serde_json::Value {
    json!({
        "type": "user.created",
        "object": "event",
        "data": {
            "id": "user_1",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "primary_email_address_id": "idn_1",
            "email_addresses": [
                {"id": "idn_1", "email_address": "ada@acme.test", "verification": {"status": "verified"}}
            ],
        },
    })
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn missing_headers_are_rejected_with_400() {
    let state = test_state().await;
    let app = router(state);

    let request = Request::builder()
        .uri("/webhooks/clerk")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(user_created_event().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tampered_body_is_rejected_with_401_and_writes_nothing() {
    let state = test_state().await;
    let app = router(state.clone());

    // Sign one body, send another.
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign("msg_1", &timestamp, &user_created_event().to_string());
    let tampered = json!({
        "type": "user.created",
        "object": "event",
        "data": {"id": "user_evil"},
    });
    let request = Request::builder()
        .uri("/webhooks/clerk")
        .method("POST")
        .header("svix-id", "msg_1")
        .header("svix-timestamp", timestamp)
        .header("svix-signature", signature)
        .body(Body::from(tampered.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(state.db.get_profile("user_evil").await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_body_with_valid_signature_is_400() {
    let state = test_state().await;
    let app = router(state);

    let body = "this is not json";
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign("msg_1", &timestamp, body);
    let request = Request::builder()
        .uri("/webhooks/clerk")
        .method("POST")
        .header("svix-id", "msg_1")
        .header("svix-timestamp", timestamp)
        .header("svix-signature", signature)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_event_type_returns_200_and_writes_no_rows() {
    let state = test_state().await;
    let app = router(state.clone());

    let event = json!({
        "type": "widget.frobnicated",
        "object": "event",
        "data": {"id": "wid_1"},
    });
    let response = app.oneshot(signed_request("msg_1", &event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Only the observational log gains a row.
    let events = state.db.recent_sync_events(10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].outcome, "ignored");
    assert_eq!(events[0].event_type, "widget.frobnicated");
}

#[tokio::test]
async fn user_created_is_idempotent_across_redelivery() {
    let state = test_state().await;

    for attempt in 0..2 {
        let app = router(state.clone());
        let response = app
            .oneshot(signed_request(&format!("msg_{attempt}"), &user_created_event()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Webhook processed successfully");
    }

    assert_eq!(state.db.count_profiles("user_1").await.unwrap(), 1);
    let profile = state.db.get_profile("user_1").await.unwrap().unwrap();
    assert_eq!(profile.email, "ada@acme.test");
}

#[tokio::test]
async fn user_created_without_verified_email_is_500_with_no_row() {
    let state = test_state().await;
    let app = router(state.clone());

    let event = json!({
        "type": "user.created",
        "object": "event",
        "data": {
            "id": "user_1",
            "email_addresses": [
                {"id": "idn_1", "email_address": "pending@acme.test", "verification": {"status": "unverified"}}
            ],
        },
    });
    let response = app.oneshot(signed_request("msg_1", &event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("verified email"));
    assert!(state.db.get_profile("user_1").await.unwrap().is_none());

    let events = state.db.recent_sync_events(10).await.unwrap();
    assert_eq!(events[0].outcome, "failed");
}

#[tokio::test]
async fn organization_created_then_updated_end_to_end() {
    let state = test_state().await;

    let created = json!({
        "type": "organization.created",
        "object": "event",
        "data": {"id": "org_1", "name": "Acme", "slug": "acme"},
    });
    let response = router(state.clone())
        .oneshot(signed_request("msg_1", &created))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let org = state.db.get_organization("org_1").await.unwrap().unwrap();
    assert_eq!(org.name, "Acme");
    assert_eq!(org.slug.as_deref(), Some("acme"));

    let updated = json!({
        "type": "organization.updated",
        "object": "event",
        "data": {"id": "org_1", "name": "Acme Inc", "slug": "acme"},
    });
    let response = router(state.clone())
        .oneshot(signed_request("msg_2", &updated))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let org = state.db.get_organization("org_1").await.unwrap().unwrap();
    assert_eq!(org.name, "Acme Inc");
    assert_eq!(org.slug.as_deref(), Some("acme"));
}

#[tokio::test]
async fn membership_lifecycle_over_http() {
    let state = test_state().await;

    // Seed the parents through the pipeline itself.
    let org_event = json!({
        "type": "organization.created",
        "object": "event",
        "data": {"id": "org_1", "name": "Acme"},
    });
    router(state.clone())
        .oneshot(signed_request("msg_1", &org_event))
        .await
        .unwrap();
    router(state.clone())
        .oneshot(signed_request("msg_2", &user_created_event()))
        .await
        .unwrap();

    let membership = json!({
        "type": "organizationMembership.created",
        "object": "event",
        "data": {
            "organization": {"id": "org_1", "name": "Acme"},
            "public_user_data": {"user_id": "user_1"},
            "role": "org_reviewer",
        },
    });
    let response = router(state.clone())
        .oneshot(signed_request("msg_3", &membership))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let row = state
        .db
        .get_membership("user_1", "org_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.role, cov_core::enums::Role::Reviewer);

    let deleted = json!({
        "type": "organizationMembership.deleted",
        "object": "event",
        "data": {
            "organization": {"id": "org_1", "name": "Acme"},
            "public_user_data": {"user_id": "user_1"},
            "role": "org_reviewer",
        },
    });
    let response = router(state.clone())
        .oneshot(signed_request("msg_4", &deleted))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        state
            .db
            .get_membership("user_1", "org_1")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn stale_timestamp_is_rejected_with_401() {
    let state = test_state().await;
    let app = router(state);

    let body = user_created_event().to_string();
    let stale = (chrono::Utc::now().timestamp() - 3600).to_string();
    let signature = sign("msg_1", &stale, &body);
    let request = Request::builder()
        .uri("/webhooks/clerk")
        .method("POST")
        .header("svix-id", "msg_1")
        .header("svix-timestamp", stale)
        .header("svix-signature", signature)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let state = test_state().await;
    let app = router(state);

    let request = Request::builder()
        .uri("/health")
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
