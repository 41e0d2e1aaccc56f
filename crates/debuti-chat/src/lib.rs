//! # debuti-chat: Shopping Assistant Proxy
//!
//! Server and client halves of the storefront chat widget.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Widget                     Proxy (this crate)            Upstream      │
//! │  ──────                     ──────────────────            ────────      │
//! │                                                                         │
//! │  ChatClient::send ──POST /api/chat──► chat_handler                      │
//! │                                        │ validate message               │
//! │                                        ▼                                │
//! │                                   ReplyEngine                           │
//! │                                    ├─ OpenAi ──POST chat/completions──► │
//! │                                    └─ Canned (no API key, offline)      │
//! │                                        │                                │
//! │  reply / ERROR_REPLY ◄──{reply}────────┘                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use debuti_chat::{ChatClient, ChatConfig, ChatServer, ReplyEngine};
//!
//! let engine = ReplyEngine::from_config(&ChatConfig::default())?;
//! let handle = ChatServer::new(engine, "127.0.0.1:0").start().await?;
//!
//! let client = ChatClient::new(&handle.base_url())?;
//! let reply = client.send("Do you offer free shipping?").await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod canned;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod server;
pub mod upstream;

// =============================================================================
// Re-exports
// =============================================================================

pub use canned::CannedResponder;
pub use client::ChatClient;
pub use config::{ChatConfig, DEFAULT_SYSTEM_PROMPT};
pub use engine::ReplyEngine;
pub use error::{ChatError, ChatResult};
pub use server::{
    router, ChatHandle, ChatReply, ChatRequest, ChatServer, ErrorBody, CHAT_PATH, HEALTH_PATH,
    METHOD_NOT_ALLOWED_MESSAGE, NO_MESSAGE_PROVIDED, UPSTREAM_FAILURE_REPLY,
};
pub use upstream::{OpenAiClient, EMPTY_COMPLETION_REPLY};
