//! # Proxy Assembly
//!
//! Turns a validated [`ProxyConfig`] into running parts: the storefront,
//! the persisted session, the reply engine, and the HTTP server.
//!
//! The HTTP surface is `/api/chat` and `/health` only. No route reads the
//! storefront or the session; they are built so startup validates the
//! storefront settings and restores the saved user, and they stay
//! reachable through [`Proxy::storefront`] and [`Proxy::auth`] for
//! embedders and tests.

use std::future::Future;

use debuti_chat::{ChatError, ChatHandle, ChatServer, ReplyEngine};
use debuti_core::{CoreError, Storefront};
use debuti_db::{Database, DbError, PersistentAuth};
use thiserror::Error;
use tracing::info;

use crate::config::ProxyConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Storefront setup failed: {0}")]
    Storefront(#[from] CoreError),

    #[error("Database setup failed: {0}")]
    Database(#[from] DbError),

    #[error("Chat setup failed: {0}")]
    Chat(#[from] ChatError),
}

pub type StartupResult<T> = Result<T, StartupError>;

pub struct Proxy {
    storefront: Storefront,
    auth: PersistentAuth,
    db: Database,
    server: ChatServer,
}

impl Proxy {
    /// Opens the database, restores any saved session, and prepares the
    /// server. Nothing is bound yet.
    pub async fn build(config: &ProxyConfig) -> StartupResult<Self> {
        let storefront = Storefront::new(config.storefront.clone())?;

        let db = Database::new(config.database.db_config()).await?;
        let auth = PersistentAuth::new(storefront.auth().clone(), db.session());
        match auth.restore().await? {
            Some(user) => info!(email = %user.email, role = %user.role, "Restored saved session"),
            None => info!("Starting signed out"),
        }

        let engine = ReplyEngine::from_config(&config.chat)?;
        let server = ChatServer::new(engine, config.server.bind_address());

        Ok(Proxy {
            storefront,
            auth,
            db,
            server,
        })
    }

    pub fn storefront(&self) -> &Storefront {
        &self.storefront
    }

    pub fn auth(&self) -> &PersistentAuth {
        &self.auth
    }

    /// Serves until `shutdown` resolves, then closes the database.
    pub async fn run_until<F>(self, shutdown: F) -> StartupResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = self.server.run_until(shutdown).await;
        self.db.close().await;
        result.map_err(StartupError::from)
    }

    /// Serves in the background. The database stays open while the handle
    /// lives.
    pub async fn start(self) -> StartupResult<(ChatHandle, Database)> {
        let handle = self.server.start().await?;
        Ok((handle, self.db))
    }
}
