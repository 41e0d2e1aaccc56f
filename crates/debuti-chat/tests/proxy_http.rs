//! End-to-end behaviour of `POST /api/chat` against a fake upstream model.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use debuti_chat::{
    ChatClient, ChatConfig, ChatHandle, ChatServer, ReplyEngine, EMPTY_COMPLETION_REPLY,
    METHOD_NOT_ALLOWED_MESSAGE, NO_MESSAGE_PROVIDED, UPSTREAM_FAILURE_REPLY,
};
use debuti_core::assistant::{canned_reply, Conversation, ERROR_REPLY};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

const API_KEY: &str = "sk-test";

// =============================================================================
// Fake upstream
// =============================================================================

#[derive(Clone, Copy)]
enum Upstream {
    Answers(&'static str),
    Empty,
    Fails,
}

#[derive(Clone)]
struct FakeState {
    behaviour: Upstream,
    last_request: Arc<Mutex<Option<Value>>>,
}

async fn completions(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let bearer = format!("Bearer {API_KEY}");
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(bearer.as_str()) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }

    *state.last_request.lock().await = Some(body);

    match state.behaviour {
        Upstream::Answers(text) => (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": text}}]})),
        ),
        Upstream::Empty => (StatusCode::OK, Json(json!({"choices": []}))),
        Upstream::Fails => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": "overloaded"})),
        ),
    }
}

/// Starts a fake model API and returns its base URL and request recorder.
async fn fake_upstream(behaviour: Upstream) -> (String, Arc<Mutex<Option<Value>>>) {
    let last_request = Arc::new(Mutex::new(None));
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(FakeState {
            behaviour,
            last_request: last_request.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{addr}/v1"), last_request)
}

/// A base URL nothing listens on.
async fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

async fn proxy(config: ChatConfig) -> ChatHandle {
    let engine = ReplyEngine::from_config(&config).unwrap();
    ChatServer::new(engine, "127.0.0.1:0").start().await.unwrap()
}

async fn post_raw(handle: &ChatHandle, body: &str) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/chat", handle.base_url()))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    (status, response.json().await.unwrap())
}

// =============================================================================
// Proxy status codes
// =============================================================================

#[tokio::test]
async fn post_returns_upstream_reply() {
    let (base_url, recorded) = fake_upstream(Upstream::Answers("The trench coat runs large.")).await;
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"  Does the trench run large?  "}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"reply": "The trench coat runs large."}));

    let sent = recorded.lock().await.clone().unwrap();
    assert_eq!(sent["model"], "gpt-4");
    assert_eq!(sent["temperature"], 0.7);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["messages"][1]["content"], "Does the trench run large?");

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_completion_gets_default_reply() {
    let (base_url, _) = fake_upstream(Upstream::Empty).await;
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"hi"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], EMPTY_COMPLETION_REPLY);
}

#[tokio::test]
async fn non_post_is_method_not_allowed() {
    let handle = proxy(ChatConfig::offline(0)).await;
    let url = format!("{}/api/chat", handle.base_url());
    let http = reqwest::Client::new();

    for response in [
        http.get(&url).send().await.unwrap(),
        http.put(&url).body("{}").send().await.unwrap(),
        http.delete(&url).send().await.unwrap(),
    ] {
        assert_eq!(response.status().as_u16(), 405);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"message": METHOD_NOT_ALLOWED_MESSAGE}));
    }
}

#[tokio::test]
async fn missing_or_blank_message_is_bad_request() {
    let handle = proxy(ChatConfig::offline(0)).await;

    for body in [r#"{}"#, r#"{"message":""}"#, r#"{"message":"   "}"#, r#"{"message":null}"#, "garbage"] {
        let (status, reply) = post_raw(&handle, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(reply, json!({"message": NO_MESSAGE_PROVIDED}));
    }
}

#[tokio::test]
async fn overlong_message_is_bad_request() {
    let handle = proxy(ChatConfig::offline(0)).await;
    let body = json!({"message": "a".repeat(2001)}).to_string();

    let (status, reply) = post_raw(&handle, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["message"], "message must be at most 2000 characters");
}

#[tokio::test]
async fn upstream_error_status_is_internal_error() {
    let (base_url, _) = fake_upstream(Upstream::Fails).await;
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"reply": UPSTREAM_FAILURE_REPLY}));
}

#[tokio::test]
async fn wrong_api_key_is_internal_error() {
    let (base_url, recorded) = fake_upstream(Upstream::Answers("unused")).await;
    let handle = proxy(ChatConfig::online("sk-wrong", base_url)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["reply"], UPSTREAM_FAILURE_REPLY);
    assert!(recorded.lock().await.is_none());
}

#[tokio::test]
async fn unreachable_upstream_is_internal_error() {
    let base_url = format!("{}/v1", dead_address().await);
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"hello"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["reply"], UPSTREAM_FAILURE_REPLY);
}

#[tokio::test]
async fn offline_mode_uses_canned_replies() {
    let handle = proxy(ChatConfig::offline(0)).await;

    let (status, body) = post_raw(&handle, r#"{"message":"What is your return policy?"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], canned_reply("What is your return policy?"));
}

#[tokio::test]
async fn health_answers_ok() {
    let handle = proxy(ChatConfig::offline(0)).await;

    let response = reqwest::get(format!("{}/health", handle.base_url())).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

// =============================================================================
// Widget-side client
// =============================================================================

#[tokio::test]
async fn client_returns_reply() {
    let (base_url, _) = fake_upstream(Upstream::Answers("Scarves are 20% off.")).await;
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;
    let client = ChatClient::new(&handle.base_url()).unwrap();

    assert_eq!(client.send("any sales?").await, "Scarves are 20% off.");
}

#[tokio::test]
async fn client_falls_back_on_server_error() {
    let (base_url, _) = fake_upstream(Upstream::Fails).await;
    let handle = proxy(ChatConfig::online(API_KEY, base_url)).await;
    let client = ChatClient::new(&handle.base_url()).unwrap();

    assert_eq!(client.send("hello").await, ERROR_REPLY);
}

#[tokio::test]
async fn client_falls_back_on_transport_error() {
    let client = ChatClient::new(&dead_address().await).unwrap();

    let reply = client.send("hello").await;

    assert_eq!(reply, ERROR_REPLY);
    assert!(!reply.is_empty());
}

#[tokio::test]
async fn client_falls_back_when_reply_missing() {
    // A server that answers 200 without a `reply` field.
    let app = Router::new().route("/api/chat", post(|| async { Json(json!({"answer": "nope"})) }));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    let client = ChatClient::new(&format!("http://{addr}")).unwrap();
    assert_eq!(client.send("hello").await, ERROR_REPLY);
}

#[tokio::test]
async fn conversation_records_both_sides() {
    let handle = proxy(ChatConfig::offline(0)).await;
    let client = ChatClient::new(&handle.base_url()).unwrap();
    let mut conversation = Conversation::new();

    let reply = client
        .converse(&mut conversation, "Which sizes do you carry?")
        .await
        .unwrap()
        .content
        .clone();

    assert_eq!(reply, canned_reply("Which sizes do you carry?"));
    assert_eq!(conversation.len(), 3);
    assert_eq!(conversation.messages()[1].content, "Which sizes do you carry?");
}
