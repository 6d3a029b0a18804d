//! Core trait for key-value storage.

use crate::error::StoreError;

/// Operations supported by a single shard and by a set of shards alike.
///
/// All implementations must be `Send + Sync`: every method takes `&self`
/// and synchronizes internally, so a store is shared between threads
/// behind an `Arc`.
pub trait KeyValueStore<V>: Send + Sync {
    /// Look up a key. Returns a clone of the stored value.
    fn get(&self, key: &str) -> Option<V>;

    /// Insert a key that is not yet present.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if the key is present; the
    /// stored value is left untouched.
    fn set(&self, key: &str, value: V) -> Result<(), StoreError>;

    /// Insert or overwrite a key unconditionally.
    fn update(&self, key: &str, value: V) -> Result<(), StoreError>;

    /// Remove a key. Returns `true` if it was present.
    fn delete(&self, key: &str) -> bool;

    /// Whether the key is present.
    fn contains(&self, key: &str) -> bool;

    /// Snapshot of every key currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;

    /// Number of entries currently stored.
    fn len(&self) -> usize;

    /// Whether the store holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
