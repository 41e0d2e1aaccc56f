//! # Proxy Configuration
//!
//! ## Load Order (later overrides earlier)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Defaults          (every field has one)                             │
//! │  2. chat-proxy.toml   ($DEBUTI_CONFIG, else the platform config dir)    │
//! │  3. Environment       DEBUTI_BIND_ADDR  DEBUTI_PORT  OPENAI_API_KEY     │
//! │                       DEBUTI_CHAT_MODEL  DEBUTI_CHAT_BASE_URL           │
//! │                       DEBUTI_DATABASE_PATH                              │
//! │  4. validate()                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `chat-proxy.toml`
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 3000
//!
//! [chat]
//! model = "gpt-4"
//! canned_delay_ms = 1000
//!
//! [storefront]
//! recently_viewed_max = 6
//!
//! [storefront.shipping]
//! free_shipping_threshold = 5000
//! flat_fee = 499
//!
//! [storefront.roles]
//! admin_emails = ["admin@debutify.com"]
//! super_admin_emails = ["owner@debutify.com"]
//!
//! [database]
//! path = "./data/storefront.db"
//! ```

use std::net::IpAddr;
use std::path::PathBuf;

use debuti_chat::{ChatConfig, ChatError};
use debuti_core::{CoreError, StorefrontSettings};
use debuti_db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CONFIG_FILE_NAME: &str = "chat-proxy.toml";

/// Path value that selects a throwaway in-memory database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid [chat] config: {0}")]
    Chat(#[from] ChatError),

    #[error("Invalid [storefront] config: {0}")]
    Storefront(#[from] CoreError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// 0 picks a free port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file holding the session slot, or `:memory:`.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("com", "debuti", "storefront")
        .map(|dirs| dirs.data_dir().join("storefront.db"))
        .unwrap_or_else(|| PathBuf::from("./data/storefront.db"))
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
        }
    }
}

impl DatabaseSettings {
    pub fn db_config(&self) -> DbConfig {
        if self.path.as_os_str() == IN_MEMORY_DATABASE {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.path)
        }
    }
}

// =============================================================================
// ProxyConfig
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub storefront: StorefrontSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl ProxyConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` wins over `DEBUTI_CONFIG`, which wins over
    /// the platform config directory.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let path = config_path
            .or_else(|| std::env::var("DEBUTI_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load proxy config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// [`load`](Self::load) with an explicit file and environment lookup.
    pub fn load_with<F>(path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading proxy config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "server.bind_addr must be an IP address, got: {}",
                self.server.bind_addr
            )));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path must not be empty".into()));
        }

        self.chat.validate()?;
        self.storefront.validate()?;

        Ok(())
    }

    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = env("DEBUTI_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = env("DEBUTI_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid DEBUTI_PORT"),
            }
        }

        if let Some(key) = env("OPENAI_API_KEY") {
            debug!("Using API key from environment");
            self.chat.api_key = Some(key);
        }

        if let Some(model) = env("DEBUTI_CHAT_MODEL") {
            self.chat.model = model;
        }

        if let Some(url) = env("DEBUTI_CHAT_BASE_URL") {
            debug!(url = %url, "Overriding chat base URL from environment");
            self.chat.base_url = url;
        }

        if let Some(path) = env("DEBUTI_DATABASE_PATH") {
            self.database.path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "debuti", "storefront")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
