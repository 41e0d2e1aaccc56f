//! # debuti-db: Session Persistence for the Debuti Storefront
//!
//! Cart, wishlist and recently-viewed live in memory only. The signed-in user
//! is the one piece of state that survives a restart; this crate keeps it in
//! a SQLite key-value slot.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AuthStore (debuti-core)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     debuti-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  kv, session  │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                                                    │   │
//! │  │   PersistentAuth: AuthStore + SessionRepository                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (path from [database] in the proxy config)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use debuti_core::AuthStore;
//! use debuti_db::{Database, DbConfig, PersistentAuth};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//! let auth = PersistentAuth::new(AuthStore::default(), db.session());
//! auth.restore().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod persistent_auth;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use persistent_auth::PersistentAuth;
pub use migrations::SchemaStatus;
pub use pool::{Database, DbConfig};

pub use repository::kv::{KvEntry, KvRepository};
pub use repository::session::{SessionRepository, SESSION_KEY};
