//! # Chat Configuration
//!
//! Settings for the upstream model call and the offline responder. The proxy
//! binary embeds this as the `[chat]` table of its TOML file.
//!
//! ```toml
//! [chat]
//! base_url = "https://api.openai.com/v1"
//! model = "gpt-4"
//! temperature = 0.7
//! timeout_secs = 30
//! canned_delay_ms = 1000
//! ```
//!
//! Leaving `api_key` unset puts the proxy in offline mode: replies come from
//! the keyword table in `debuti_core::assistant`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ChatError, ChatResult};

/// Persona sent as the system message on every upstream call.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a stylish, friendly, and knowledgeable shopping assistant for DebutiStyle. You help users with questions about products, trends, promotions, and shopping help. Always respond like a helpful personal shopper.";

#[derive(Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Bearer key for the upstream API. `None` means offline mode.
    #[serde(default)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API root; `/chat/completions` is appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Whole-request timeout for the upstream call (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Simulated typing delay of the offline responder (milliseconds).
    #[serde(default = "default_canned_delay")]
    pub canned_delay_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_canned_delay() -> u64 {
    1000
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
            timeout_secs: default_timeout(),
            canned_delay_ms: default_canned_delay(),
        }
    }
}

// The key stays out of logs.
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("canned_delay_ms", &self.canned_delay_ms)
            .finish_non_exhaustive()
    }
}

impl ChatConfig {
    /// Config for an upstream at `base_url` using `api_key`.
    pub fn online(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        ChatConfig {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Offline config answering after `delay_ms`.
    pub fn offline(delay_ms: u64) -> Self {
        ChatConfig {
            canned_delay_ms: delay_ms,
            ..Self::default()
        }
    }

    /// True when no usable API key is configured.
    pub fn is_offline(&self) -> bool {
        self.api_key
            .as_deref()
            .map_or(true, |key| key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn canned_delay(&self) -> Duration {
        Duration::from_millis(self.canned_delay_ms)
    }

    /// `{base_url}/chat/completions`, tolerant of a trailing slash.
    pub fn completions_url(&self) -> ChatResult<Url> {
        let raw = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let url = Url::parse(&raw).map_err(|e| ChatError::InvalidUrl(format!("{raw}: {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ChatError::InvalidUrl(format!(
                "base_url must use http or https, got: {other}"
            ))),
        }
    }

    pub fn validate(&self) -> ChatResult<()> {
        self.completions_url()?;

        if self.model.trim().is_empty() {
            return Err(ChatError::InvalidConfig("model must not be empty".into()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ChatError::InvalidConfig(format!(
                "temperature must be between 0 and 2, got: {}",
                self.temperature
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ChatError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
