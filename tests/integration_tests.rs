//! Integration tests for Better Boss.
//!
//! A mock Messages API runs on a loopback port; the proxy under test forwards
//! to it, and the client controller talks to the proxy over real HTTP.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Json;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use betterboss::connector::http;
use betterboss::{
    AnthropicProvider, ChatController, ChatProxyUseCase, DomainError, HttpChatGateway,
    InMemorySessionStore, SendOutcome, SessionKey, SessionStore, ToolTag, Turn,
};

#[derive(Clone, Default)]
struct Upstream {
    seen: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

impl Upstream {
    async fn calls(&self) -> usize {
        self.seen.lock().await.len()
    }

    async fn last(&self) -> (HeaderMap, Value) {
        self.seen.lock().await.last().cloned().expect("upstream was called")
    }
}

fn api_error(kind: &str, message: &str) -> Json<Value> {
    Json(json!({ "type": "error", "error": { "type": kind, "message": message } }))
}

/// Answers by key: `revoked` → 401, `throttled` → 429, `overloaded` → 529,
/// anything else echoes the last turn split over two text blocks.
async fn messages(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    upstream.seen.lock().await.push((headers, body.clone()));

    match key.as_str() {
        "sk-ant-revoked" => (
            StatusCode::UNAUTHORIZED,
            api_error("authentication_error", "invalid x-api-key"),
        ),
        "sk-ant-throttled" => (
            StatusCode::TOO_MANY_REQUESTS,
            api_error("rate_limit_error", "Number of requests has exceeded your rate limit"),
        ),
        "sk-ant-overloaded" => (
            StatusCode::from_u16(529).unwrap(),
            api_error("overloaded_error", "Overloaded"),
        ),
        _ => {
            let last = body["messages"]
                .as_array()
                .and_then(|m| m.last())
                .and_then(|m| m["content"].as_str())
                .unwrap_or_default()
                .to_string();
            (
                StatusCode::OK,
                Json(json!({
                    "content": [
                        { "type": "text", "text": "Echo: " },
                        { "type": "web_search_tool_result", "tool_use_id": "srvtoolu_1", "content": [] },
                        { "type": "text", "text": last }
                    ],
                    "usage": { "input_tokens": 42, "output_tokens": 7 }
                })),
            )
        }
    }
}

async fn spawn(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Mock upstream plus a proxy in front of it; returns the proxy URL.
async fn setup_proxy() -> (Upstream, String) {
    let upstream = Upstream::default();
    let upstream_url = spawn(
        axum::Router::new()
            .route("/v1/messages", post(messages))
            .with_state(upstream.clone()),
    )
    .await;

    let provider = Arc::new(AnthropicProvider::new(upstream_url));
    let proxy_url = spawn(http::router(Arc::new(ChatProxyUseCase::new(provider)))).await;
    (upstream, proxy_url)
}

fn controller(proxy_url: &str, store: Arc<InMemorySessionStore>) -> ChatController {
    ChatController::new(store, Arc::new(HttpChatGateway::new(proxy_url)))
}

#[tokio::test]
async fn test_conversation_through_proxy() {
    let (upstream, proxy_url) = setup_proxy().await;
    let store = Arc::new(InMemorySessionStore::new());
    let client = controller(&proxy_url, store.clone());

    client.submit_credential("sk-ant-good").await.expect("probe succeeds");
    assert_eq!(
        store.load(SessionKey::Credential).await.unwrap().as_deref(),
        Some("sk-ant-good")
    );

    let outcome = client
        .send_message("Kitchen remodel 12x14", ToolTag::new("ESTIMATE"))
        .await;
    assert_eq!(outcome, SendOutcome::Replied);
    assert_eq!(
        client.turns(),
        vec![
            Turn::user("Kitchen remodel 12x14"),
            Turn::assistant("Echo: [TOOL:ESTIMATE] Kitchen remodel 12x14"),
        ]
    );

    assert_eq!(upstream.calls().await, 2);
    let (headers, body) = upstream.last().await;
    assert_eq!(headers["x-api-key"], "sk-ant-good");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["tools"][0]["type"], "web_search_20250305");
    assert_eq!(body["tools"][0]["max_uses"], 3);
    assert!(body["system"].as_str().unwrap().starts_with("You are Mr. Better Boss"));
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "[TOOL:ESTIMATE] Kitchen remodel 12x14");
}

#[tokio::test]
async fn test_history_is_forwarded_untagged() {
    let (upstream, proxy_url) = setup_proxy().await;
    let client = controller(&proxy_url, Arc::new(InMemorySessionStore::new()));
    client.submit_credential("sk-ant-good").await.unwrap();

    client.send_message("first", ToolTag::new("EMAIL")).await;
    client.send_message("second", None).await;

    let (_, body) = upstream.last().await;
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["content"], "first");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[2]["content"], "second");
}

#[tokio::test]
async fn test_revoked_key_fails_probe() {
    let (_, proxy_url) = setup_proxy().await;
    let store = Arc::new(InMemorySessionStore::new());
    let client = controller(&proxy_url, store.clone());

    let err = client.submit_credential("sk-ant-revoked").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidCredential));
    assert_eq!(
        client.error().as_deref(),
        Some("Invalid API key. Please check your key and try again.")
    );
    assert!(store.load(SessionKey::Credential).await.unwrap().is_none());
}

#[tokio::test]
async fn test_cached_key_rejected_mid_conversation() {
    let (_, proxy_url) = setup_proxy().await;
    let store = Arc::new(InMemorySessionStore::new());
    store
        .save(SessionKey::Credential, "sk-ant-revoked")
        .await
        .unwrap();
    let client = controller(&proxy_url, store);
    client.load().await.unwrap();

    let outcome = client.send_message("hello", None).await;
    assert_eq!(outcome, SendOutcome::CredentialRejected);
    assert_eq!(
        client.turns()[1].content(),
        "Your API key appears to be invalid or expired. Please go to Settings > API to update it."
    );
    assert!(client.needs_credential());
}

#[tokio::test]
async fn test_rate_limit_becomes_assistant_turn() {
    let (_, proxy_url) = setup_proxy().await;
    let store = Arc::new(InMemorySessionStore::new());
    store
        .save(SessionKey::Credential, "sk-ant-throttled")
        .await
        .unwrap();
    let client = controller(&proxy_url, store);
    client.load().await.unwrap();

    assert_eq!(client.send_message("hello", None).await, SendOutcome::Failed);
    assert_eq!(
        client.turns()[1].content(),
        "Error: Rate limit exceeded. Please wait a moment and try again."
    );
}

#[tokio::test]
async fn test_unreachable_proxy_is_a_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let store = Arc::new(InMemorySessionStore::new());
    store.save(SessionKey::Credential, "sk-ant-good").await.unwrap();
    let client = controller(&dead_url, store);
    client.load().await.unwrap();

    assert_eq!(client.send_message("hello", None).await, SendOutcome::Failed);
    assert_eq!(
        client.turns()[1].content(),
        "Connection error. Please check your internet connection and try again."
    );
    assert!(!client.is_busy());

    let err = client.submit_credential("sk-ant-other").await.unwrap_err();
    assert!(matches!(err, DomainError::NetworkFailure(_)));
    assert_eq!(
        client.error().as_deref(),
        Some("Connection failed. Make sure you are online and the API key is valid.")
    );
}

async fn post_chat(proxy_url: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_proxy_validates_credential_before_upstream() {
    let (upstream, proxy_url) = setup_proxy().await;
    let messages = json!([{ "role": "user", "content": "hi" }]);

    let (status, body) = post_chat(&proxy_url, json!({ "messages": messages })).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "API key is required" }));

    let (status, body) =
        post_chat(&proxy_url, json!({ "messages": messages, "apiKey": "sk-live-1" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid API key format");

    assert_eq!(upstream.calls().await, 0);
}

#[tokio::test]
async fn test_proxy_maps_upstream_failures() {
    let (_, proxy_url) = setup_proxy().await;
    let messages = json!([{ "role": "user", "content": "hi" }]);

    let (status, body) =
        post_chat(&proxy_url, json!({ "messages": messages, "apiKey": "sk-ant-revoked" })).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid API key. Please check your key and try again.");

    let (status, body) =
        post_chat(&proxy_url, json!({ "messages": messages, "apiKey": "sk-ant-throttled" })).await;
    assert_eq!(status, 429);
    assert_eq!(body["error"], "Rate limit exceeded. Please wait a moment and try again.");

    let (status, body) =
        post_chat(&proxy_url, json!({ "messages": messages, "apiKey": "sk-ant-overloaded" })).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Overloaded");
}

#[tokio::test]
async fn test_proxy_success_passes_usage_through() {
    let (_, proxy_url) = setup_proxy().await;

    let (status, body) = post_chat(
        &proxy_url,
        json!({
            "messages": [{ "role": "user", "content": "hi" }],
            "apiKey": "sk-ant-good",
            "tool": "KNOWLEDGE"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["content"], "Echo: [TOOL:KNOWLEDGE] hi");
    assert_eq!(body["usage"], json!({ "input_tokens": 42, "output_tokens": 7 }));
}

#[tokio::test]
async fn test_proxy_rejects_malformed_body() {
    let (upstream, proxy_url) = setup_proxy().await;

    let response = reqwest::Client::new()
        .post(format!("{proxy_url}/api/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
    assert_eq!(upstream.calls().await, 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_, proxy_url) = setup_proxy().await;

    let body: Value = reqwest::get(format!("{proxy_url}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "status": "ok", "provider": "anthropic" }));
}
