//! # Error Types
//!
//! Domain-specific error types for debuti-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  debuti-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── AuthError        - Login and user-management denials             │
//! │                                                                         │
//! │  debuti-db errors (separate crate)                                     │
//! │  └── DbError          - Session slot failures                          │
//! │                                                                         │
//! │  debuti-chat errors (separate crate)                                   │
//! │  └── ChatError        - Proxy / upstream failures                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store operations never return errors: invalid input to a store (an
//! unknown id, a quantity below one) is a silent no-op. Errors here cover the
//! places where the caller must react, such as a rejected login.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core storefront errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not in the catalog.
    #[error("No product with id {0} in the catalog")]
    ProductNotFound(u64),

    /// A setting is outside its allowed range.
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Authorization or login failure (wraps AuthError).
    #[error(transparent)]
    Auth(#[from] AuthError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rejected shopper or admin input: login fields, chat text, settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank after trimming.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// e.g. an email without a domain.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Auth Error
// =============================================================================

/// Login and authorization errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password missing or malformed.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(#[from] ValidationError),

    /// The acting role may not perform this operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    NotSignedIn,
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooLong {
            field: "message".to_string(),
            max: 2000,
        };
        assert_eq!(err.to_string(), "message must be at most 2000 characters");
    }

    #[test]
    fn test_auth_error_wraps_validation() {
        let err: AuthError = ValidationError::Required {
            field: "password".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid credentials: password is required");
    }

    #[test]
    fn test_errors_convert_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "email".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = AuthError::NotSignedIn.into();
        assert_eq!(core_err.to_string(), "Not signed in");
    }
}
