//! # Upstream Client
//!
//! One best-effort call to an OpenAI-compatible `chat/completions` endpoint
//! per shopper message. No retries, no conversation history: the model sees
//! the persona prompt and the single message.

use std::fmt;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};

/// Reply used when the model answers with no content.
pub const EMPTY_COMPLETION_REPLY: &str = "I'm here to assist you!";

// Upstream error bodies can be large HTML pages.
const MAX_LOGGED_BODY: usize = 512;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [UpstreamMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct UpstreamMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first choice, or the fixed reply when there is none.
    fn into_reply(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_REPLY.to_string())
    }
}

#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f64,
    system_prompt: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Builds a client from `config`. Fails if no API key is set.
    pub fn new(config: &ChatConfig) -> ChatResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ChatError::InvalidConfig("api_key is required".into()))?
            .to_string();

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(OpenAiClient {
            http,
            endpoint: config.completions_url()?,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Asks the model to answer `message`.
    pub async fn complete(&self, message: &str) -> ChatResult<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: [
                UpstreamMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                UpstreamMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: self.temperature,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "Calling upstream model");

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_LOGGED_BODY {
                let mut cut = MAX_LOGGED_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!(status = status.as_u16(), "Upstream model call rejected");
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        Ok(completion.into_reply())
    }
}
