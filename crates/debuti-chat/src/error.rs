//! # Chat Errors
//!
//! Failures inside the proxy. None of these reach the shopper verbatim: the
//! server maps them to a fixed reply and [`ChatClient`](crate::ChatClient)
//! maps them to [`ERROR_REPLY`](debuti_core::assistant::ERROR_REPLY).

use debuti_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The other side answered with a non-2xx status.
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// A 2xx answer that carried no usable reply.
    #[error("Reply was missing or empty")]
    EmptyReply,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid chat config: {0}")]
    InvalidConfig(String),

    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type ChatResult<T> = Result<T, ChatError>;
