//! sessionrpc Storage Layer
//!
//! Holds the single session identifier slot a client reads before every
//! call and clears when the backend asks for a reset.
//! An empty value is the same as no value.

mod database;
mod error;
mod migrations;
mod store;

pub use database::SqliteStore;
pub use error::StorageError;
pub use store::{MemoryStore, SessionStore};

pub type Result<T> = std::result::Result<T, StorageError>;
