//! sessionrpc Core
//!
//! Wires configuration, storage and the sessioned client together and owns
//! the heartbeat for the lifetime of the process.

mod config;
mod error;
mod keeper;

pub use config::{Config, StoreConfig};
pub use error::CoreError;
pub use keeper::SessionKeeper;

// Re-export client components
pub use sessionrpc_client::{
    is_truthy, start_heartbeat, HeartbeatHandle, RpcError, RpcRequest, RpcResponse,
    SessionedRpcClient, DEFAULT_HEARTBEAT_INTERVAL, NEW_SESSION_METHOD, UPDATE_SESSION_METHOD,
};
pub use sessionrpc_storage::{MemoryStore, SessionStore, SqliteStore, StorageError};
pub use url::Url;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
