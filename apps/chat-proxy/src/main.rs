//! # Debuti Chat Proxy
//!
//! Serves `POST /api/chat` for the storefront chat widget.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Chat Proxy Server                                │
//! │                                                                         │
//! │  Widget ───► HTTP (3000) ───► ReplyEngine ───► Model API               │
//! │                  │                 │                                    │
//! │                  ▼                 └──► canned replies (no API key)     │
//! │               SQLite                                                    │
//! │           (auth_user slot)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use debuti_chat_proxy::{Proxy, ProxyConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Debuti chat proxy...");

    let config = ProxyConfig::load(None).context("loading configuration")?;
    info!(
        addr = %config.server.bind_address(),
        offline = config.chat.is_offline(),
        database = %config.database.path.display(),
        "Configuration loaded"
    );

    let proxy = Proxy::build(&config).await.context("starting proxy")?;
    proxy.run_until(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
