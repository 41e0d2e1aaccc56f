//! # Shopping Assistant
//!
//! The offline assistant: keyword-matched canned replies and the
//! conversation log shown in the chat widget.
//!
//! ## Keyword Rules (first match wins)
//! ```text
//! ┌──────────────────────────────────┬──────────────────────────────────────┐
//! │  Keywords                        │  Topic                               │
//! ├──────────────────────────────────┼──────────────────────────────────────┤
//! │  hello, hi                       │  greeting                            │
//! │  shipping, delivery              │  shipping times and free threshold   │
//! │  return, refund                  │  30-day return policy                │
//! │  size, sizing                    │  size range and charts               │
//! │  discount, coupon, sale          │  newsletter discount, promotions     │
//! │  material, fabric                │  sustainable materials               │
//! │  payment, pay                    │  accepted payment methods            │
//! │  (anything else)                 │  contact customer service            │
//! └──────────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Matching is case-insensitive and word-based. Keywords shorter than four
//! letters must match a whole word ("hi" does not fire on "shipping");
//! longer keywords also match words they start ("refunds", "sizes").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::validate_chat_message;

/// First message of every conversation.
pub const GREETING: &str = "Hello! I'm your DebutiStyle shopping assistant. How can I help you today? You can ask about our products, sizing, shipping, or anything else related to your shopping experience!";

/// Shown in place of a reply when the assistant could not answer.
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again later.";

const HELLO_REPLY: &str = "Hello there! How can I assist you with your shopping today?";
const SHIPPING_REPLY: &str = "We offer free shipping on orders over $50. Standard delivery takes 3-5 business days, and express delivery is available for an additional fee.";
const RETURNS_REPLY: &str = "Our return policy allows you to return items within 30 days of receipt. All items must be unworn with original tags attached. Refunds are processed within 5-7 business days after we receive your returned items.";
const SIZING_REPLY: &str = "We offer sizes XS through 3XL for most of our items. You can find detailed size charts on each product page. If you're between sizes, we generally recommend sizing up for a more comfortable fit.";
const DISCOUNT_REPLY: &str = "You can sign up for our newsletter to receive a 15% discount on your first purchase. We also run seasonal sales and special promotions for our loyal customers.";
const MATERIALS_REPLY: &str = "We prioritize high-quality, sustainable materials for our products. Specific material information is provided on each product page. Many of our items use organic cotton, recycled polyester, and other eco-friendly materials.";
const PAYMENT_REPLY: &str = "We accept all major credit cards, PayPal, Apple Pay, and Google Pay. All transactions are secure and encrypted.";
const CONTACT_REPLY: &str = "Thank you for your question. Our team is constantly improving this AI assistant. For more specific information, please contact our customer service team at support@debutistyle.com.";

const RULES: &[(&[&str], &str)] = &[
    (&["hello", "hi"], HELLO_REPLY),
    (&["shipping", "delivery"], SHIPPING_REPLY),
    (&["return", "refund"], RETURNS_REPLY),
    (&["size", "sizing"], SIZING_REPLY),
    (&["discount", "coupon", "sale"], DISCOUNT_REPLY),
    (&["material", "fabric"], MATERIALS_REPLY),
    (&["payment", "pay"], PAYMENT_REPLY),
];

// =============================================================================
// Canned Replies
// =============================================================================

fn keyword_matches(word: &str, keyword: &str) -> bool {
    if keyword.len() < 4 {
        word == keyword
    } else {
        word.starts_with(keyword)
    }
}

/// The canned reply for `message`.
pub fn canned_reply(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();

    RULES
        .iter()
        .find(|(keywords, _)| {
            keywords
                .iter()
                .any(|keyword| words.iter().any(|word| keyword_matches(word, keyword)))
        })
        .map(|(_, reply)| *reply)
        .unwrap_or(CONTACT_REPLY)
}

// =============================================================================
// Conversation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[ts(as = "String")]
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        }
    }
}

/// The chat widget's message log, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// A conversation opened by the assistant's greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
        }
    }

    /// Appends the shopper's message, trimmed. Blank input is rejected and
    /// leaves the log untouched.
    pub fn push_user(&mut self, text: &str) -> Result<&ChatMessage, ValidationError> {
        let content = validate_chat_message(text)?;
        Ok(self.push(ChatMessage::new(ChatRole::User, content)))
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(ChatMessage::new(ChatRole::Assistant, text))
    }

    /// Records a failed reply as the fixed error message.
    pub fn push_error(&mut self) -> &ChatMessage {
        self.push_assistant(ERROR_REPLY)
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
