//! End-to-end tests: the relay router in front of a real local webhook.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use chat_relay::config::WebhookConfig;
use chat_relay::retry::RetryPolicy;
use chat_relay::server::{router, AppState};

fn action_body(user_id: Option<&str>) -> String {
    let mut session = json!({ "x-hasura-role": "user" });
    if let Some(id) = user_id {
        session["x-hasura-user-id"] = json!(id);
    }
    json!({
        "action": { "name": "sendMessage" },
        "input": { "chat_id": "chat-1", "message": "hi there" },
        "session_variables": session
    })
    .to_string()
}

async fn call(app: Router, method: &str, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

/// Serve `app` on an ephemeral port and return its address.
async fn spawn_webhook(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Webhook that counts hits and answers every call with `status` and `body`.
async fn counting_webhook(status: StatusCode, body: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/hook",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, body).into_response()
            }
        }),
    );
    (spawn_webhook(app).await, hits)
}

fn relay_for(addr: SocketAddr, timeout: Duration, retry: RetryPolicy) -> Router {
    let config = WebhookConfig {
        url: Some(format!("http://{}/hook", addr)),
        timeout,
        retry,
        ..WebhookConfig::default()
    };
    router(AppState::from_config(&config).unwrap())
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(20),
    }
}

// ─── Validation Through The Router ───────────────────────

#[tokio::test]
async fn test_health() {
    let response = router(AppState::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let (status, body) = call(router(AppState::default()), "GET", "/sendMessage", String::new()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, body) =
        call(router(AppState::default()), "POST", "/sendMessage", "{oops".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn test_missing_user_is_unauthorized() {
    let (addr, hits) = counting_webhook(StatusCode::OK, "{}").await;
    let app = relay_for(addr, Duration::from_secs(5), RetryPolicy::disabled());
    let (status, body) = call(app, "POST", "/sendMessage", action_body(None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unconfigured_webhook_is_server_error() {
    let (status, body) =
        call(router(AppState::default()), "POST", "/sendMessage", action_body(Some("u1"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Webhook is not configured");
}

// ─── Webhook Round Trips ─────────────────────────────────

#[tokio::test]
async fn test_relays_payload_and_wraps_reply() {
    let seen: Arc<std::sync::Mutex<Option<Value>>> = Arc::default();
    let sink = seen.clone();
    let app = Router::new().route(
        "/hook",
        post(move |Json(payload): Json<Value>| {
            let sink = sink.clone();
            async move {
                *sink.lock().unwrap() = Some(payload);
                Json(json!({ "ok": true, "reply": "hello" }))
            }
        }),
    );
    let addr = spawn_webhook(app).await;

    let relay = relay_for(addr, Duration::from_secs(5), RetryPolicy::disabled());
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": { "ok": true, "reply": "hello" } }));

    let payload = seen.lock().unwrap().clone().unwrap();
    assert_eq!(payload["chat_id"], "chat-1");
    assert_eq!(payload["message"], "hi there");
    assert_eq!(payload["user_id"], "u1");
    assert!(payload["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_upstream_error_is_bad_gateway() {
    let (addr, hits) = counting_webhook(StatusCode::INTERNAL_SERVER_ERROR, "workflow crashed").await;
    let relay = relay_for(addr, Duration::from_secs(5), RetryPolicy::disabled());
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "n8n webhook failed");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("HTTP 500"));
    assert!(details.contains("workflow crashed"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_5xx_is_retried() {
    let (addr, hits) = counting_webhook(StatusCode::SERVICE_UNAVAILABLE, "down").await;
    let relay = relay_for(addr, Duration::from_secs(5), fast_retry(2));
    let (status, _) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_upstream_4xx_is_not_retried() {
    let (addr, hits) = counting_webhook(StatusCode::NOT_FOUND, "no such hook").await;
    let relay = relay_for(addr, Duration::from_secs(5), fast_retry(2));
    let (status, _) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_401_is_not_reported_as_unauthorized() {
    let (addr, _) = counting_webhook(StatusCode::UNAUTHORIZED, "bad api key").await;
    let relay = relay_for(addr, Duration::from_secs(5), RetryPolicy::disabled());
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "n8n webhook failed");
    assert!(body["details"].as_str().unwrap().contains("HTTP 401"));
}

#[tokio::test]
async fn test_upstream_504_is_not_retried() {
    let (addr, hits) = counting_webhook(StatusCode::GATEWAY_TIMEOUT, "slow workflow").await;
    let relay = relay_for(addr, Duration::from_secs(5), fast_retry(2));
    let (status, _) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_json_reply_is_invalid_response() {
    let (addr, _) = counting_webhook(StatusCode::OK, "<html>ok</html>").await;
    let relay = relay_for(addr, Duration::from_secs(5), RetryPolicy::disabled());
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Invalid response from webhook");
}

#[tokio::test]
async fn test_slow_webhook_times_out_without_retry() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/hook",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({ "ok": true }))
            }
        }),
    );
    let addr = spawn_webhook(app).await;

    let relay = relay_for(addr, Duration::from_millis(100), fast_retry(3));
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Webhook request timed out");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_webhook_is_network_error() {
    // bind then drop to get a port nothing listens on
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let relay = relay_for(addr, Duration::from_secs(2), RetryPolicy::disabled());
    let (status, body) = call(relay, "POST", "/sendMessage", action_body(Some("u1"))).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Network error occurred");
}
