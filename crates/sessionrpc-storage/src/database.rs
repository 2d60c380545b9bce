//! SQLite-backed session slot

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::store::SessionStore;
use crate::Result;

/// Keeps the session identifier in a `client_state` row so it survives
/// process restarts.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    key: String,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P, key: impl Into<String>) -> Result<Self> {
        let key = validate_key(key.into())?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            key,
        })
    }

    pub fn open_in_memory(key: impl Into<String>) -> Result<Self> {
        let key = validate_key(key.into())?;
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            key,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }
}

impl SessionStore for SqliteStore {
    fn get(&self) -> Result<Option<String>> {
        let value: Option<String> = self.with_connection(|conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM client_state WHERE key = ?1",
                    [&self.key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })?;

        Ok(value.filter(|v| !v.is_empty()))
    }

    fn set(&self, session_id: &str) -> Result<()> {
        if session_id.is_empty() {
            return self.clear();
        }

        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO client_state (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![self.key, session_id, updated_at],
            )?;
            Ok(())
        })?;

        tracing::debug!(key = %self.key, "Stored session identifier");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM client_state WHERE key = ?1", [&self.key])?;
            Ok(())
        })
    }
}

impl Clone for SqliteStore {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
            key: self.key.clone(),
        }
    }
}

fn validate_key(key: String) -> Result<String> {
    if key.trim().is_empty() {
        Err(StorageError::EmptyKey)
    } else {
        Ok(key)
    }
}
