//! # Persistent Auth
//!
//! Keeps an in-memory [`AuthStore`] and the `auth_user` slot in step.
//!
//! ```text
//!   startup  ──► restore()  slot ──► AuthStore::restore
//!   login    ──► login()    authenticate ──► slot.save ──► AuthStore::sign_in
//!   logout   ──► logout()   slot.clear ──► AuthStore::logout
//! ```
//!
//! The slot is written first. A failed write leaves the in-memory store as
//! it was, so memory never claims a session the next start would not see.

use debuti_core::{AuthStore, User};
use tracing::info;

use crate::error::DbResult;
use crate::repository::session::SessionRepository;

#[derive(Debug, Clone)]
pub struct PersistentAuth {
    auth: AuthStore,
    session: SessionRepository,
}

impl PersistentAuth {
    pub fn new(auth: AuthStore, session: SessionRepository) -> Self {
        Self { auth, session }
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    /// Loads the persisted user into the store. Returns the restored user.
    pub async fn restore(&self) -> DbResult<Option<User>> {
        let Some(user) = self.session.load().await? else {
            info!("No saved session");
            return Ok(None);
        };
        self.auth.restore(user);
        Ok(self.auth.current_user())
    }

    /// Signs in and persists the new user.
    ///
    /// Rejected credentials write nothing.
    pub async fn login(&self, email: &str, password: &str) -> DbResult<User> {
        let user = self.auth.authenticate(email, password)?;
        self.session.save(&user).await?;
        self.auth.sign_in(user.clone());
        Ok(user)
    }

    /// Signs out and erases the slot. Returns `false` if nobody was signed in.
    pub async fn logout(&self) -> DbResult<bool> {
        self.session.clear().await?;
        Ok(self.auth.logout())
    }
}
