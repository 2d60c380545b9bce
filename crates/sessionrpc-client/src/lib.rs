//! sessionrpc Client
//!
//! - Lazily creates a backend session (`newSession`) on the first call
//! - Attaches the session identifier to every later call
//! - Drops the identifier when a response carries `resetSession`
//! - Keeps the session alive with a periodic `updateSession` heartbeat

mod client;
mod envelope;
mod error;
mod heartbeat;
mod invoker;
mod resolver;

pub use client::SessionedRpcClient;
pub use envelope::{is_truthy, RpcRequest, RpcResponse};
pub use error::RpcError;
pub use heartbeat::{
    start_heartbeat, HeartbeatHandle, DEFAULT_HEARTBEAT_INTERVAL, UPDATE_SESSION_METHOD,
};
pub use invoker::Invoker;
pub use resolver::{SessionResolver, NEW_SESSION_METHOD};

pub use sessionrpc_storage::{MemoryStore, SessionStore, SqliteStore, StorageError};

pub type Result<T> = std::result::Result<T, RpcError>;
