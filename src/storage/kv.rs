//! Key-value store abstraction
//!
//! Every widget persists its state as serialized text under string keys, the
//! way a browser's local storage works. The trait keeps the substrate
//! injectable so widgets can be tested against [`MemoryStore`] and run against
//! [`SqliteStore`](super::SqliteStore) in production.

use crate::storage::error::{StorageError, StorageResult};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A synchronous string-to-string store
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key, returning whether it existed
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// All keys starting with `prefix`, in lexicographic order
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Remove every key
    fn clear(&self) -> StorageResult<()>;

    /// All keys in the store
    fn keys(&self) -> StorageResult<Vec<String>> {
        self.keys_with_prefix("")
    }
}

/// In-memory store backed by a sorted map
///
/// Used by tests and by the server's ephemeral mode.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Lock(format!("Memory store lock poisoned: {}", e))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.clear();
        Ok(())
    }
}
