//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

/// Where the session identifier lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Lost when the process exits
    Memory,
    /// SQLite file, survives restarts
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin, e.g. `http://localhost:8080`
    pub base_url: String,
    /// RPC endpoint path joined onto `base_url`
    pub endpoint: String,
    /// Seconds between heartbeats; 0 disables the heartbeat
    pub heartbeat_interval_secs: u64,
    /// Per-request timeout; none by default
    pub request_timeout_secs: Option<u64>,
    /// Storage key holding the session identifier
    pub session_key: String,
    pub store: StoreConfig,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: "/api".to_string(),
            heartbeat_interval_secs: 10,
            request_timeout_secs: None,
            session_key: "sessionId".to_string(),
            store: StoreConfig::Memory,
        }
    }

    /// Read a JSON config file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Defaults overlaid with `SESSIONRPC_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("SESSIONRPC_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(endpoint) = lookup("SESSIONRPC_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(secs) = lookup("SESSIONRPC_HEARTBEAT_SECS") {
            self.heartbeat_interval_secs = secs.trim().parse().map_err(|_| {
                CoreError::Config(format!("SESSIONRPC_HEARTBEAT_SECS is not a number: {secs}"))
            })?;
        }
        if let Some(path) = lookup("SESSIONRPC_STORE_PATH").filter(|p| !p.trim().is_empty()) {
            self.store = StoreConfig::Sqlite {
                path: PathBuf::from(path),
            };
        }
        Ok(())
    }

    /// Full RPC endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        if base.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "base_url cannot be a base: {}",
                self.base_url
            )));
        }
        Ok(base.join(&self.endpoint)?)
    }

    pub fn heartbeat_interval(&self) -> Option<Duration> {
        (self.heartbeat_interval_secs > 0).then(|| Duration::from_secs(self.heartbeat_interval_secs))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
