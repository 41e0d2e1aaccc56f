//! # Validation Module
//!
//! Input checks for the few places where the storefront must reject input
//! instead of ignoring it: login credentials and chat messages.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront UI (TypeScript)                                   │
//! │  ├── Disabled submit buttons, required inputs                          │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Rust                                                          │
//! │  ├── serde deserialization (shape)                                     │
//! │  └── THIS MODULE: credential and chat message rules                    │
//! │                                                                         │
//! │  Store operations are NOT validated here: a bad quantity or an unknown │
//! │  id is a silent no-op inside the store.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use debuti_core::validation::{validate_credentials, validate_chat_message};
//!
//! validate_credentials("shopper@example.com", "hunter2").unwrap();
//! assert_eq!(validate_chat_message("  hi  ").unwrap(), "hi");
//! ```

use crate::error::ValidationError;
use crate::MAX_CHAT_MESSAGE_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Credential Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
///
/// Intentionally loose: the login is mocked, this only catches typos.
///
/// ```rust
/// use debuti_core::validation::validate_email;
///
/// assert!(validate_email("admin@debutify.com").is_ok());
/// assert!(validate_email("admin@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must have exactly one @ after a name"));
    }

    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid("must have a domain like example.com"));
    }

    Ok(())
}

/// Validates a password for the mock login. Any non-empty password passes.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    Ok(())
}

/// Validates both login fields, email first.
pub fn validate_credentials(email: &str, password: &str) -> ValidationResult<()> {
    validate_email(email)?;
    validate_password(password)
}

// =============================================================================
// Chat Validators
// =============================================================================

/// Validates a chat message typed by the shopper.
///
/// ## Rules
/// - Blank (empty or whitespace-only) is rejected
/// - At most [`MAX_CHAT_MESSAGE_LEN`] characters after trimming
///
/// ## Returns
/// The trimmed message.
pub fn validate_chat_message(message: &str) -> ValidationResult<String> {
    let message = message.trim();

    if message.is_empty() {
        return Err(ValidationError::Required {
            field: "message".to_string(),
        });
    }

    if message.chars().count() > MAX_CHAT_MESSAGE_LEN {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max: MAX_CHAT_MESSAGE_LEN,
        });
    }

    Ok(message.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
