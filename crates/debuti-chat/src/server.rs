//! # Chat Server
//!
//! The `POST /api/chat` endpoint the storefront widget talks to.
//!
//! ## Responses
//! ```text
//! ┌──────────────────────────────────────┬────────┬──────────────────────────────────────────────┐
//! │ Request                              │ Status │ Body                                         │
//! ├──────────────────────────────────────┼────────┼──────────────────────────────────────────────┤
//! │ POST {"message": "..."}              │ 200    │ {"reply": "..."}                             │
//! │ any other method                     │ 405    │ {"message": "Method Not Allowed"}            │
//! │ missing / blank / unparseable        │ 400    │ {"message": "No message provided"}           │
//! │ message over the length limit        │ 400    │ {"message": "message must be at most ..."}   │
//! │ upstream failure                     │ 500    │ {"reply": "Oops! Something went wrong. ..."} │
//! │ GET /health                          │ 200    │ ok                                           │
//! └──────────────────────────────────────┴────────┴──────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use debuti_core::validation::validate_chat_message;
use debuti_core::ValidationError;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::ReplyEngine;
use crate::error::{ChatError, ChatResult};

pub const CHAT_PATH: &str = "/api/chat";
pub const HEALTH_PATH: &str = "/health";

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";
pub const NO_MESSAGE_PROVIDED: &str = "No message provided";
pub const UPSTREAM_FAILURE_REPLY: &str = "Oops! Something went wrong. Please try again.";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Body of 4xx answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

// A missing or null message parses; the handler reports it, and any body
// that fails to parse, as "no message".
#[derive(Debug, Deserialize)]
struct IncomingChat {
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// Router
// =============================================================================

struct ChatState {
    engine: ReplyEngine,
}

/// Builds the proxy router around `engine`.
pub fn router(engine: ReplyEngine) -> Router {
    Router::new()
        .route(CHAT_PATH, any(chat_handler))
        .route(HEALTH_PATH, get(health_handler))
        .with_state(Arc::new(ChatState { engine }))
}

async fn health_handler() -> impl IntoResponse {
    "ok"
}

async fn chat_handler(
    State(state): State<Arc<ChatState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        debug!(%method, "Rejecting non-POST chat request");
        return error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE);
    }

    let message = match parse_message(&body) {
        Ok(message) => message,
        Err(ChatError::Validation(err @ ValidationError::TooLong { .. })) => {
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
        Err(err) => {
            debug!(error = %err, "Rejecting chat request without a message");
            return error_response(StatusCode::BAD_REQUEST, NO_MESSAGE_PROVIDED);
        }
    };

    match state.engine.reply(&message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply { reply })).into_response(),
        Err(err) => {
            warn!(error = %err, engine = state.engine.mode(), "Chat reply failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    reply: UPSTREAM_FAILURE_REPLY.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn parse_message(body: &[u8]) -> ChatResult<String> {
    let incoming: IncomingChat = serde_json::from_slice(body)?;
    Ok(validate_chat_message(incoming.message.as_deref().unwrap_or_default())?)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

// =============================================================================
// Server
// =============================================================================

pub struct ChatServer {
    engine: ReplyEngine,
    bind_addr: String,
}

/// Handle to a server started with [`ChatServer::start`].
pub struct ChatHandle {
    local_addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl ChatHandle {
    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://{local_addr}`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn shutdown(self) -> ChatResult<()> {
        // A closed channel means the server already stopped.
        let _ = self.shutdown_tx.send(()).await;
        self.task
            .await
            .map_err(|e| ChatError::Server(format!("Server task failed: {e}")))
    }
}

impl ChatServer {
    pub fn new(engine: ReplyEngine, bind_addr: impl Into<String>) -> Self {
        ChatServer {
            engine,
            bind_addr: bind_addr.into(),
        }
    }

    async fn bind(&self) -> ChatResult<TcpListener> {
        TcpListener::bind(&self.bind_addr)
            .await
            .map_err(|e| ChatError::Bind {
                addr: self.bind_addr.clone(),
                reason: e.to_string(),
            })
    }

    /// Starts the server in the background and returns a handle.
    pub async fn start(self) -> ChatResult<ChatHandle> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let listener = self.bind().await?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ChatError::Server(e.to_string()))?;
        info!(addr = %local_addr, engine = self.engine.mode(), "Chat server started");

        let app = router(self.engine);
        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await;
                    info!("Chat server shutting down");
                })
                .await
            {
                warn!(error = %err, "Chat server stopped with an error");
            }
        });

        Ok(ChatHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }

    /// Serves in the foreground until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> ChatResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        info!(addr = %self.bind_addr, engine = self.engine.mode(), "Chat server listening");

        axum::serve(listener, router(self.engine))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ChatError::Server(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message() {
        assert_eq!(parse_message(br#"{"message":"  hi  "}"#).unwrap(), "hi");
        assert!(matches!(
            parse_message(br#"{"message":""}"#),
            Err(ChatError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            parse_message(br#"{}"#),
            Err(ChatError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            parse_message(br#"{"message":42}"#),
            Err(ChatError::Serialization(_))
        ));
        assert!(matches!(
            parse_message(b"not json"),
            Err(ChatError::Serialization(_))
        ));
    }

    #[test]
    fn test_parse_rejects_long_message() {
        let long = format!(r#"{{"message":"{}"}}"#, "a".repeat(2001));
        assert!(matches!(
            parse_message(long.as_bytes()),
            Err(ChatError::Validation(ValidationError::TooLong { max: 2000, .. }))
        ));
    }
}
