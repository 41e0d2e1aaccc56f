//! # Key-Value Repository
//!
//! String slots in the `kv_store` table. Writes are upserts, so a key holds
//! at most one value.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// One stored slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.get_entry(key).await?.map(|entry| entry.value))
    }

    pub async fn get_entry(&self, key: &str) -> DbResult<Option<KvEntry>> {
        let row: Option<(String, String, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT key, value, updated_at
            FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(key, value, updated_at)| KvEntry {
            key,
            value,
            updated_at,
        }))
    }

    /// Inserts or replaces the value under `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing kv slot");

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes `key`. Returns `false` if it was not present.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Deleted kv slot");
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_set_get_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        assert_eq!(kv.get("theme").await.unwrap(), None);

        kv.set("theme", "classic").await.unwrap();
        kv.set("theme", "luxury").await.unwrap();
        assert_eq!(kv.get("theme").await.unwrap().as_deref(), Some("luxury"));

        assert!(kv.delete("theme").await.unwrap());
        assert!(!kv.delete("theme").await.unwrap());
        assert_eq!(kv.get("theme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_refreshes_timestamp() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kv = db.kv();

        kv.set("k", "1").await.unwrap();
        let first = kv.get_entry("k").await.unwrap().unwrap();
        kv.set("k", "2").await.unwrap();
        let second = kv.get_entry("k").await.unwrap().unwrap();

        assert_eq!(second.value, "2");
        assert!(second.updated_at >= first.updated_at);
    }
}
