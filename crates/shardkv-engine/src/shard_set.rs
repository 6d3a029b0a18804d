//! The shard set: fixed shards plus a router.

use rayon::prelude::*;
use shardkv_placement::{Router, Strategy};
use shardkv_store::{KeyValueStore, MemoryStore, StoreError};
use tracing::{debug, info};

use crate::config::ShardSetConfig;
use crate::error::EngineError;

/// A fixed, ordered collection of shards behind a deterministic router.
///
/// Every key lives in exactly one shard, chosen by the router at call time.
/// The shard list and the routing table never change after construction, so
/// reading them needs no lock; each shard carries its own reader/writer lock
/// and there is no lock spanning shards.
///
/// Per-key operations are linearizable within their shard. There is no
/// ordering between operations on different shards and no multi-key
/// atomicity.
pub struct ShardSet<V> {
    shards: Vec<MemoryStore<V>>,
    router: Router,
}

impl<V: Clone + Send + Sync> ShardSet<V> {
    /// Build a set of `shard_count` empty shards routed by `strategy`.
    ///
    /// A consistent ring built this way gives each shard a single position.
    /// Use [`ShardSet::from_config`] to set more.
    pub fn new(shard_count: usize, strategy: Strategy) -> Result<Self, EngineError> {
        Self::from_config(&ShardSetConfig::new(shard_count, strategy))
    }

    /// Build a shard set from a configuration.
    ///
    /// Fails with [`EngineError::Placement`] when the shard count is zero,
    /// when the fixed strategy is given more than one shard, or when a ring
    /// is given zero positions per shard.
    pub fn from_config(config: &ShardSetConfig) -> Result<Self, EngineError> {
        let router = Router::new(config.strategy, config.shard_count, config.vnodes_per_shard)?;
        let shards = (0..config.shard_count).map(|_| MemoryStore::new()).collect();

        info!(
            shards = config.shard_count,
            strategy = %config.strategy,
            vnodes = config.vnodes_per_shard,
            "built shard set"
        );
        Ok(Self { shards, router })
    }

    /// Index of the shard that owns `key`.
    pub fn shard_for(&self, key: &str) -> usize {
        self.router.route(key)
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Routing strategy in use.
    pub fn strategy(&self) -> Strategy {
        self.router.strategy()
    }

    /// The router, for inspecting placement.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Entry count of every shard, indexed by shard.
    ///
    /// Gathered with the same parallel fan-out as [`keys`](Self::keys); each
    /// count is exact for its shard at the moment its lock was held.
    pub fn populations(&self) -> Vec<usize> {
        self.shards.par_iter().map(|shard| shard.len()).collect()
    }

    fn shard(&self, key: &str) -> &MemoryStore<V> {
        &self.shards[self.router.route(key)]
    }
}

impl<V: Clone + Send + Sync> KeyValueStore<V> for ShardSet<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Uniqueness is checked in the owning shard only. Routing is
    /// deterministic, so no other shard can hold the key.
    fn set(&self, key: &str, value: V) -> Result<(), StoreError> {
        self.shard(key).set(key, value)
    }

    fn update(&self, key: &str, value: V) -> Result<(), StoreError> {
        self.shard(key).update(key, value)
    }

    fn delete(&self, key: &str) -> bool {
        self.shard(key).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.shard(key).contains(key)
    }

    /// Union of every shard's keys.
    ///
    /// All shards are read concurrently, each under its own shared lock, and
    /// the snapshots are merged once every shard has answered. Each shard's
    /// part is a consistent snapshot; the whole is not, since writers may
    /// touch other shards between those snapshots.
    fn keys(&self) -> Vec<String> {
        let per_shard: Vec<Vec<String>> =
            self.shards.par_iter().map(|shard| shard.keys()).collect();

        let total = per_shard.iter().map(Vec::len).sum();
        let mut keys = Vec::with_capacity(total);
        for shard_keys in per_shard {
            keys.extend(shard_keys);
        }

        debug!(shards = self.shards.len(), keys = total, "collected keys");
        keys
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }
}

impl<V> std::fmt::Debug for ShardSet<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardSet")
            .field("shards", &self.shards.len())
            .field("strategy", &self.router.strategy())
            .finish()
    }
}
