//! Session slot abstraction and the in-memory backend

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::StorageError;
use crate::Result;

/// A single persisted session identifier slot.
///
/// Implementations must treat an empty stored value exactly like an absent
/// one: `get` never returns `Some("")`.
pub trait SessionStore: Send + Sync {
    /// Current identifier, `None` when absent or empty
    fn get(&self) -> Result<Option<String>>;

    /// Replace the identifier. Setting an empty string clears the slot.
    fn set(&self, session_id: &str) -> Result<()>;

    /// Drop the identifier so the next call bootstraps a new session
    fn clear(&self) -> Result<()>;
}

/// Process-lifetime storage, the equivalent of a tab-scoped key/value store.
///
/// Clones share the same underlying map.
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    key: String,
}

impl MemoryStore {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StorageError::EmptyKey);
        }

        Ok(Self {
            values: Arc::new(RwLock::new(HashMap::new())),
            key,
        })
    }

    /// Another slot backed by the same map
    pub fn with_key(&self, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(StorageError::EmptyKey);
        }

        Ok(Self {
            values: Arc::clone(&self.values),
            key,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .values
            .read()
            .get(&self.key)
            .filter(|value| !value.is_empty())
            .cloned())
    }

    fn set(&self, session_id: &str) -> Result<()> {
        if session_id.is_empty() {
            return self.clear();
        }

        self.values
            .write()
            .insert(self.key.clone(), session_id.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.values.write().remove(&self.key);
        Ok(())
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            key: self.key.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new("sessionId").unwrap();
        assert_eq!(store.get().unwrap(), None);

        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap(), Some("abc".to_string()));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_empty_value_reads_as_absent() {
        let store = MemoryStore::new("sessionId").unwrap();
        store.set("abc").unwrap();
        store.set("").unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_clones_share_slot() {
        let store = MemoryStore::new("sessionId").unwrap();
        let other = store.clone();
        store.set("abc").unwrap();
        assert_eq!(other.get().unwrap(), Some("abc".to_string()));

        let sibling = store.with_key("otherId").unwrap();
        assert_eq!(sibling.get().unwrap(), None);
    }

    #[test]
    fn test_rejects_blank_key() {
        assert!(matches!(
            MemoryStore::new("  "),
            Err(StorageError::EmptyKey)
        ));
    }
}
