//! Drives the Google Identity Toolkit client against an in-process stub of
//! the provider's REST endpoints.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use terralink_backend::{GoogleIdentity, IdentityError, IdentityProvider};

/// Minimal identitytoolkit lookalike. Routed through a fallback handler
/// because the real paths (`/v1/accounts:signUp`) embed a colon.
async fn provider_stub(request: Request) -> impl IntoResponse {
    let path = request.uri().path().to_string();
    let bytes = axum::body::to_bytes(request.into_body(), 64 * 1024)
        .await
        .unwrap_or_default();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    if path.ends_with("accounts:signUp") {
        if body["email"] == "taken@example.com" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": "EMAIL_EXISTS" } })),
            );
        }
        return (StatusCode::OK, Json(json!({ "localId": "uid-123" })));
    }

    if path.ends_with("accounts:lookup") {
        if body["idToken"] == "valid-token" {
            return (
                StatusCode::OK,
                Json(json!({
                    "users": [{
                        "localId": "uid-123",
                        "email": "ben@example.com",
                        "displayName": "Ben"
                    }]
                })),
            );
        }
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "INVALID_ID_TOKEN" } })),
        );
    }

    (StatusCode::NOT_FOUND, Json(json!({ "error": { "message": "unknown endpoint" } })))
}

async fn spawn_provider_stub() -> String {
    let router = axum::Router::new().fallback(provider_stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://127.0.0.1:{}/v1", port)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_user_returns_the_provider_uid() {
    let base_url = spawn_provider_stub().await;
    let client = GoogleIdentity::new(base_url, "test-key".to_string());

    let uid = client
        .create_user("ben@example.com", "hunter22")
        .await
        .unwrap();
    assert_eq!(uid, "uid-123");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_user_surfaces_provider_rejections() {
    let base_url = spawn_provider_stub().await;
    let client = GoogleIdentity::new(base_url, "test-key".to_string());

    let err = client
        .create_user("taken@example.com", "hunter22")
        .await
        .unwrap_err();
    match err {
        IdentityError::Rejected(msg) => assert!(msg.contains("EMAIL_EXISTS")),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verify_token_exchanges_a_token_for_an_identity() {
    let base_url = spawn_provider_stub().await;
    let client = GoogleIdentity::new(base_url, "test-key".to_string());

    let identity = client.verify_token("valid-token").await.unwrap();
    assert_eq!(identity.uid, "uid-123");
    assert_eq!(identity.email, "ben@example.com");
    assert_eq!(identity.name.as_deref(), Some("Ben"));

    let err = client.verify_token("expired-token").await.unwrap_err();
    match err {
        IdentityError::InvalidToken(msg) => assert!(msg.contains("INVALID_ID_TOKEN")),
        other => panic!("expected InvalidToken, got {:?}", other),
    }
}
