//! # Chat Client
//!
//! What the chat widget does with a shopper's message: post it to the proxy
//! and show whatever comes back. [`ChatClient::send`] never fails; anything
//! other than a 2xx answer with a non-empty `reply` becomes
//! [`ERROR_REPLY`].

use std::time::Duration;

use debuti_core::assistant::{ChatMessage, Conversation, ERROR_REPLY};
use debuti_core::ValidationError;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::{ChatError, ChatResult};
use crate::server::{ChatRequest, CHAT_PATH};

const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    endpoint: Url,
}

impl ChatClient {
    /// Client for the proxy rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: &str) -> ChatResult<Self> {
        Self::with_timeout(base_url, DEFAULT_CLIENT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ChatResult<Self> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH);
        let endpoint = Url::parse(&raw).map_err(|e| ChatError::InvalidUrl(format!("{raw}: {e}")))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(ChatClient { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The assistant's reply to `message`, or [`ERROR_REPLY`].
    pub async fn send(&self, message: &str) -> String {
        match self.try_send(message).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, endpoint = %self.endpoint, "Chat request failed");
                ERROR_REPLY.to_string()
            }
        }
    }

    /// Like [`send`](Self::send) but reports why a reply was unusable.
    pub async fn try_send(&self, message: &str) -> ChatResult<String> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: ReplyBody = response.json().await?;
        body.reply
            .filter(|reply| !reply.trim().is_empty())
            .ok_or(ChatError::EmptyReply)
    }

    /// Records `text` in `conversation`, asks the proxy, and records the reply.
    ///
    /// Blank input is rejected before anything is sent.
    pub async fn converse<'c>(
        &self,
        conversation: &'c mut Conversation,
        text: &str,
    ) -> Result<&'c ChatMessage, ValidationError> {
        let content = conversation.push_user(text)?.content.clone();
        let reply = self.send(&content).await;
        Ok(conversation.push_assistant(reply))
    }
}
