//! # Database Errors
//!
//! Everything that can go wrong between the auth store and the session file.
//!
//! ```text
//!   sqlx::Error ─────────┐
//!   MigrateError ────────┤
//!   serde_json::Error ───┼──► DbError ──► PersistentAuth caller
//!   AuthError (login) ───┘
//! ```

use debuti_core::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or created (permissions, a
    /// missing volume, a full disk).
    #[error("Cannot open session database: {0}")]
    Open(String),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// SQLite rejected a statement.
    #[error("Statement failed: {0}")]
    Statement(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("Timed out waiting for a database connection")]
    Busy,

    /// The session slot could not be encoded.
    #[error("Session encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Login was rejected before anything was written.
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Other(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::Statement(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Open("connection pool is closed".to_string()),
            sqlx::Error::Io(io) => DbError::Open(io.to_string()),
            other => DbError::Other(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Busy
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Open(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Other(_)
        ));
    }

    #[test]
    fn test_auth_error_is_transparent() {
        let err: DbError = AuthError::NotSignedIn.into();
        assert_eq!(err.to_string(), "Not signed in");
    }
}
