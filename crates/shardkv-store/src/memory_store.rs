//! In-memory shard backed by a `RwLock<HashMap>`.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// One shard: a key-value map guarded by a single reader/writer lock.
///
/// Reads take the shared lock, mutations take the exclusive lock. Every
/// operation acquires the lock exactly once, so a check and the mutation
/// that depends on it (as in [`set`](KeyValueStore::set)) cannot be split by
/// another writer.
pub struct MemoryStore<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> MemoryStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // A writer that panicked cannot leave the map half-modified, so a
    // poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return a reference to the inner lock (for testing purposes).
    #[cfg(test)]
    pub(crate) fn inner(&self) -> &RwLock<HashMap<String, V>> {
        &self.entries
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for MemoryStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.read().len())
            .finish()
    }
}

impl<V: Clone + Send + Sync> KeyValueStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        let mut map = self.write();
        match map.entry(key.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(value);
                debug!(%key, "inserted entry");
                Ok(())
            }
        }
    }

    fn update(&self, key: &str, value: V) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }

        self.write().insert(key.to_string(), value);
        debug!(%key, "updated entry");
        Ok(())
    }

    fn delete(&self, key: &str) -> bool {
        let removed = self.write().remove(key).is_some();
        if removed {
            debug!(%key, "deleted entry");
        }
        removed
    }

    fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        let map = self.read();
        let mut keys = Vec::with_capacity(map.len());
        keys.extend(map.keys().cloned());
        keys
    }

    fn len(&self) -> usize {
        self.read().len()
    }
}
