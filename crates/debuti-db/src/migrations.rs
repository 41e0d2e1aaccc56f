//! # Schema Migrations
//!
//! The session database has one table, `kv_store`. Its schema lives in
//! `migrations/sqlite/` at the workspace root and is compiled into the
//! binary, so a fresh machine needs nothing but a writable data directory.
//!
//! New schema goes in a new numbered file; applied files are never edited.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// How far a database is behind the embedded schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub embedded: usize,
    pub applied: usize,
}

impl SchemaStatus {
    pub fn pending(&self) -> usize {
        self.embedded.saturating_sub(self.applied)
    }

    pub fn is_current(&self) -> bool {
        self.pending() == 0
    }
}

/// Brings the schema up to date. Already-applied steps are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    let before = schema_status(pool).await?;
    if before.is_current() {
        debug!(applied = before.applied, "Schema already current");
        return Ok(());
    }

    MIGRATOR.run(pool).await?;
    info!(applied = before.pending(), "Schema migrated");
    Ok(())
}

/// Compares the embedded schema with the bookkeeping table. A database that
/// was never migrated reports zero applied steps.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let applied: Option<i64> = sqlx::query_scalar(
        "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
    )
    .fetch_one(pool)
    .await
    .ok();

    Ok(SchemaStatus {
        embedded: MIGRATOR.migrations.len(),
        applied: applied.map_or(0, |count| count.max(0) as usize),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_count() {
        let status = SchemaStatus {
            embedded: 3,
            applied: 1,
        };
        assert_eq!(status.pending(), 2);
        assert!(!status.is_current());

        let status = SchemaStatus {
            embedded: 1,
            applied: 1,
        };
        assert!(status.is_current());
    }
}
