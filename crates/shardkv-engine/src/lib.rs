//! Sharded, concurrency-safe in-process key-value cache.
//!
//! A [`ShardSet`] owns a fixed number of [`MemoryStore`] shards and a
//! [`Router`]. Per-key operations are routed to exactly one shard and take
//! only that shard's lock; [`ShardSet::keys`] fans out to every shard in
//! parallel and merges the per-shard snapshots.
//!
//! ```
//! use shardkv_engine::{KeyValueStore, ShardSet, Strategy};
//!
//! let cache = ShardSet::new(3, Strategy::Modulo).unwrap();
//! cache.set("a", 1).unwrap();
//! assert_eq!(cache.get("a"), Some(1));
//! assert!(cache.set("a", 2).is_err());
//! ```
//!
//! [`MemoryStore`]: shardkv_store::MemoryStore
//! [`Router`]: shardkv_placement::Router

pub mod config;
pub mod error;
pub mod shard_set;

pub use config::ShardSetConfig;
pub use error::EngineError;
pub use shard_set::ShardSet;
pub use shardkv_placement::Strategy;
pub use shardkv_store::{KeyValueStore, StoreError};

#[cfg(test)]
mod tests;
