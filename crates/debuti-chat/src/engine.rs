//! # Reply Engine
//!
//! Picks where replies come from: the upstream model when an API key is
//! configured, the canned responder otherwise.

use tracing::info;

use crate::canned::CannedResponder;
use crate::config::ChatConfig;
use crate::error::ChatResult;
use crate::upstream::OpenAiClient;

#[derive(Debug, Clone)]
pub enum ReplyEngine {
    OpenAi(OpenAiClient),
    Canned(CannedResponder),
}

impl ReplyEngine {
    pub fn from_config(config: &ChatConfig) -> ChatResult<Self> {
        config.validate()?;

        if config.is_offline() {
            info!(delay_ms = config.canned_delay_ms, "No API key configured, using canned replies");
            return Ok(ReplyEngine::Canned(CannedResponder::from_config(config)));
        }

        let client = OpenAiClient::new(config)?;
        info!(endpoint = %client.endpoint(), model = %config.model, "Using upstream model");
        Ok(ReplyEngine::OpenAi(client))
    }

    /// Short name for logs and the health line.
    pub fn mode(&self) -> &'static str {
        match self {
            ReplyEngine::OpenAi(_) => "openai",
            ReplyEngine::Canned(_) => "canned",
        }
    }

    /// Answers one (already validated) message.
    pub async fn reply(&self, message: &str) -> ChatResult<String> {
        match self {
            ReplyEngine::OpenAi(client) => client.complete(message).await,
            ReplyEngine::Canned(responder) => Ok(responder.reply(message).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;

    #[test]
    fn test_mode_follows_api_key() {
        let offline = ReplyEngine::from_config(&ChatConfig::offline(0)).unwrap();
        assert_eq!(offline.mode(), "canned");

        let online =
            ReplyEngine::from_config(&ChatConfig::online("sk-test", "https://api.openai.com/v1"))
                .unwrap();
        assert_eq!(online.mode(), "openai");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ChatConfig::online("sk-test", "ftp://example.com");
        assert!(matches!(
            ReplyEngine::from_config(&config),
            Err(ChatError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_canned_engine_replies() {
        let engine = ReplyEngine::from_config(&ChatConfig::offline(0)).unwrap();
        let reply = engine.reply("How long does delivery take?").await.unwrap();
        assert!(reply.contains("shipping"));
    }
}
