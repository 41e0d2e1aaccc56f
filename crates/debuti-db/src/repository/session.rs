//! # Session Repository
//!
//! The signed-in user, persisted as JSON under the fixed key `auth_user`.
//! Written on login, erased on logout, read once on startup.
//!
//! A slot that no longer decodes (hand-edited, or written by an older build)
//! is treated as "nobody signed in" and erased.

use chrono::{DateTime, Utc};
use debuti_core::User;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::kv::KvRepository;

/// Key of the session slot.
pub const SESSION_KEY: &str = "auth_user";

#[derive(Debug, Clone)]
pub struct SessionRepository {
    kv: KvRepository,
}

impl SessionRepository {
    pub fn new(kv: KvRepository) -> Self {
        SessionRepository { kv }
    }

    pub async fn save(&self, user: &User) -> DbResult<()> {
        let json = serde_json::to_string(user)?;
        self.kv.set(SESSION_KEY, &json).await?;
        debug!(user_id = %user.id, "Session saved");
        Ok(())
    }

    /// The persisted user, if any.
    pub async fn load(&self) -> DbResult<Option<User>> {
        let Some(json) = self.kv.get(SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<User>(&json) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                warn!(error = %err, "Discarding unreadable session slot");
                self.kv.delete(SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    /// Erases the slot. Returns `false` if it was already empty.
    pub async fn clear(&self) -> DbResult<bool> {
        self.kv.delete(SESSION_KEY).await
    }

    /// When the slot was last written.
    pub async fn saved_at(&self) -> DbResult<Option<DateTime<Utc>>> {
        Ok(self
            .kv
            .get_entry(SESSION_KEY)
            .await?
            .map(|entry| entry.updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use debuti_core::{Role, User};

    async fn repo() -> SessionRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().session()
    }

    #[tokio::test]
    async fn test_empty_slot_loads_none() {
        let session = repo().await;
        assert!(session.load().await.unwrap().is_none());
        assert!(session.saved_at().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let session = repo().await;
        let user = User::new("admin@debutify.com", Role::Admin);

        session.save(&user).await.unwrap();
        assert_eq!(session.load().await.unwrap(), Some(user));
        assert!(session.saved_at().await.unwrap().is_some());

        assert!(session.clear().await.unwrap());
        assert!(!session.clear().await.unwrap());
        assert!(session.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_user() {
        let session = repo().await;
        session.save(&User::new("a@example.com", Role::User)).await.unwrap();
        let second = User::new("owner@debutify.com", Role::SuperAdmin);
        session.save(&second).await.unwrap();

        assert_eq!(session.load().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_corrupt_slot_is_discarded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.kv().set(SESSION_KEY, "{not json").await.unwrap();

        let session = db.session();
        assert!(session.load().await.unwrap().is_none());
        assert_eq!(db.kv().get(SESSION_KEY).await.unwrap(), None);
    }
}
