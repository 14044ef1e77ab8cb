//! Namespaced, typed view over a key-value store
//!
//! Each widget owns one [`Namespace`]; every key it touches is written as
//! `"{namespace}:{name}"`, so two widgets can never collide on a key.
//! Values are JSON.

use crate::storage::error::StorageResult;
use crate::storage::kv::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Separator between namespace and key name
pub const NAMESPACE_SEPARATOR: char = ':';

/// A widget's slice of the store
#[derive(Clone)]
pub struct Namespace {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Namespace {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            prefix: format!("{}{}", namespace, NAMESPACE_SEPARATOR),
        }
    }

    /// Namespace name without the separator
    pub fn name(&self) -> &str {
        self.prefix.trim_end_matches(NAMESPACE_SEPARATOR)
    }

    /// Full store key for a name in this namespace
    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Load and decode a value, `Ok(None)` when absent
    pub fn try_load<T: DeserializeOwned>(&self, name: &str) -> StorageResult<Option<T>> {
        match self.store.get(&self.key(name))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Load a value, falling back to `T::default()` when absent or unreadable
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        self.load_or_else(name, T::default)
    }

    /// Load a value, falling back to `default()` when absent or unreadable
    ///
    /// Corrupt or unreadable data is logged and never fatal.
    pub fn load_or_else<T: DeserializeOwned>(&self, name: &str, default: impl FnOnce() -> T) -> T {
        match self.try_load(name) {
            Ok(Some(value)) => value,
            Ok(None) => default(),
            Err(e) => {
                tracing::warn!(
                    key = %self.key(name),
                    error = %e,
                    "Discarding unreadable stored value, using default"
                );
                default()
            }
        }
    }

    /// Encode and store a value
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(&self.key(name), &raw)
    }

    /// Remove a single name
    pub fn remove(&self, name: &str) -> StorageResult<bool> {
        self.store.remove(&self.key(name))
    }

    /// Names (without the prefix) stored in this namespace
    pub fn names(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .store
            .keys_with_prefix(&self.prefix)?
            .into_iter()
            .map(|k| k[self.prefix.len()..].to_string())
            .collect())
    }

    /// Remove every key in this namespace
    pub fn clear(&self) -> StorageResult<usize> {
        let keys = self.store.keys_with_prefix(&self.prefix)?;
        for key in &keys {
            self.store.remove(key)?;
        }
        Ok(keys.len())
    }
}
