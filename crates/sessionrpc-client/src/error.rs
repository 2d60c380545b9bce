//! RPC error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response body is not a JSON object")]
    InvalidEnvelope,

    #[error("Failed to create new session: {0}")]
    SessionUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sessionrpc_storage::StorageError),
}
