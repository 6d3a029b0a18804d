//! Single-shard key-value storage for shardkv.
//!
//! This crate defines the [`KeyValueStore`] trait, the operation surface
//! shared by one shard and by a whole shard set, and [`MemoryStore`], the
//! shard itself: a `HashMap` guarded by one reader/writer lock.

mod error;
mod memory_store;
mod traits;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use traits::KeyValueStore;
