//! # Canned Responder
//!
//! Offline stand-in for the model: waits a moment, then answers from the
//! keyword table in [`debuti_core::assistant`].

use std::time::Duration;

use debuti_core::assistant::canned_reply;
use tokio::time::sleep;

use crate::config::ChatConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedResponder {
    delay: Duration,
}

impl CannedResponder {
    pub fn new(delay: Duration) -> Self {
        CannedResponder { delay }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.canned_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn reply(&self, message: &str) -> String {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        canned_reply(message).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debuti_core::assistant::{canned_reply, GREETING};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_delay() {
        let responder = CannedResponder::new(Duration::from_millis(1000));
        let started = Instant::now();

        let reply = responder.reply("Do you ship internationally?").await;

        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(reply, canned_reply("Do you ship internationally?"));
    }

    #[tokio::test]
    async fn test_zero_delay_answers_immediately() {
        let responder = CannedResponder::new(Duration::ZERO);
        let reply = responder.reply("hello").await;
        assert!(!reply.is_empty());
        assert_ne!(reply, GREETING);
    }

    #[test]
    fn test_from_config() {
        let responder = CannedResponder::from_config(&ChatConfig::offline(250));
        assert_eq!(responder.delay(), Duration::from_millis(250));
    }
}
