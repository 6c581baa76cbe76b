//! Integration tests for the HTTP adapters against a local axum server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use medtrack_core::{Mailer, OutgoingEmail, ProfileApi, ProfileClient};
use medtrack_providers::{HttpMailer, HttpProfileClient};
use serde_json::Value;

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    format!("http://{addr}")
}

async fn profile_email(headers: HeaderMap) -> Result<Json<String>, StatusCode> {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer token-123");

    if authorized {
        Ok(Json("carer@example.com".to_string()))
    } else {
        Err(StatusCode::FORBIDDEN)
    }
}

fn profile_router() -> Router {
    Router::new().route(
        "/v2/accounts/~current/settings/Profile.email",
        get(profile_email),
    )
}

fn client() -> HttpProfileClient {
    HttpProfileClient::new(Duration::from_secs(5)).expect("Failed to build client")
}

#[tokio::test]
async fn test_profile_lookup_returns_email() {
    let endpoint = spawn(profile_router()).await;
    let api = ProfileApi {
        endpoint,
        access_token: "token-123".to_string(),
    };

    let email = client().email(&api).await.expect("lookup should succeed");
    assert_eq!(email, "carer@example.com");
}

#[tokio::test]
async fn test_profile_lookup_fails_on_non_success_status() {
    let endpoint = spawn(profile_router()).await;
    let api = ProfileApi {
        endpoint,
        access_token: "wrong-token".to_string(),
    };

    assert!(client().email(&api).await.is_err());
}

type Outbox = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn accept_mail(
    State(outbox): State<Outbox>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    outbox.lock().expect("outbox lock").push((auth, body));
    StatusCode::ACCEPTED
}

fn email() -> OutgoingEmail {
    OutgoingEmail {
        from: "reports@example.com".to_string(),
        to: "carer@example.com".to_string(),
        subject: "Medical History for Bob for the past 3 days".to_string(),
        text: "You have requested to see Bob's medical history for the past 3 days:\n\n".to_string(),
    }
}

#[tokio::test]
async fn test_mailer_posts_json_with_bearer_key() {
    let outbox: Outbox = Arc::default();
    let router = Router::new()
        .route("/send", post(accept_mail))
        .with_state(outbox.clone());
    let base = spawn(router).await;

    let mailer = HttpMailer::new(format!("{base}/send"), "mail-key".to_string());
    mailer.send(&email()).await.expect("send should succeed");

    let sent = outbox.lock().expect("outbox lock").clone();
    assert_eq!(sent.len(), 1);
    let (auth, body) = &sent[0];
    assert_eq!(auth.as_deref(), Some("Bearer mail-key"));
    assert_eq!(body["to"][0], "carer@example.com");
    assert_eq!(body["subject"], "Medical History for Bob for the past 3 days");
}

#[tokio::test]
async fn test_mailer_surfaces_rejections() {
    let router = Router::new().route(
        "/send",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn(router).await;

    let mailer = HttpMailer::new(format!("{base}/send"), "mail-key".to_string());
    assert!(mailer.send(&email()).await.is_err());
}
