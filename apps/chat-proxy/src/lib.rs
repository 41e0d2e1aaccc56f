//! # Debuti Chat Proxy
//!
//! Library half of the `chat-proxy` binary: configuration loading and
//! startup wiring, kept here so integration tests can drive them.

pub mod app;
pub mod config;

pub use app::{Proxy, StartupError, StartupResult};
pub use config::{ConfigError, ConfigResult, ProxyConfig};
