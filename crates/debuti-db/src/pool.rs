//! # Session Database
//!
//! Opens the SQLite file behind the session slot and hands out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [database] path ──► DbConfig ──► Database::new ──► schema migrated     │
//! │                                        │                                │
//! │                              db.kv()  ─┴─  db.session()                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases use WAL mode. An in-memory database lives exactly as long
//! as its single connection, so that connection is never recycled.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::kv::KvRepository;
use crate::repository::session::SessionRepository;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Where the session database lives and how many connections it gets.
///
/// ```rust
/// use debuti_db::DbConfig;
///
/// let config = DbConfig::new("./data/storefront.db").pool_size(2);
/// assert_eq!(config.pool_size, 2);
/// assert!(!config.is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite file, created with its parent directory if missing.
    pub path: PathBuf,

    /// Upper bound on pooled connections. The session slot sees one write
    /// per login, so a handful is plenty.
    pub pool_size: u32,

    pub acquire_timeout: Duration,

    /// Apply embedded migrations on open.
    pub migrate_on_open: bool,
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            pool_size: 4,
            acquire_timeout: Duration::from_secs(30),
            migrate_on_open: true,
        }
    }

    /// A private database that disappears with the pool.
    pub fn in_memory() -> Self {
        DbConfig {
            path: PathBuf::from(IN_MEMORY_PATH),
            pool_size: 1,
            acquire_timeout: Duration::from_secs(5),
            migrate_on_open: true,
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size.max(1);
        self
    }

    pub fn migrate_on_open(mut self, migrate: bool) -> Self {
        self.migrate_on_open = migrate;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(IN_MEMORY_PATH)
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        if self.is_in_memory() {
            return "sqlite::memory:"
                .parse::<SqliteConnectOptions>()
                .map_err(|e| DbError::Open(e.to_string()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Open(format!("cannot create {}: {e}", parent.display())))?;
        }

        Ok(SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Pool handle. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.path.display(), "Opening session database");

        let mut options = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout);

        options = if config.is_in_memory() {
            options.idle_timeout(None).max_lifetime(None)
        } else {
            options.idle_timeout(Duration::from_secs(600))
        };

        let pool = options
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DbError::Open(e.to_string()))?;
        debug!(pool_size = config.pool_size, "Session database pool ready");

        let db = Database { pool };
        if config.migrate_on_open {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// For queries not covered by repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn kv(&self) -> KvRepository {
        KvRepository::new(self.pool.clone())
    }

    /// The signed-in user slot.
    pub fn session(&self) -> SessionRepository {
        SessionRepository::new(self.kv())
    }

    pub async fn close(&self) {
        debug!("Closing session database");
        self.pool.close().await;
    }

    /// True while the pool can still run a statement.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
