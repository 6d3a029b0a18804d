//! Shard set configuration.

use serde::Deserialize;
use shardkv_placement::Strategy;

/// Parameters for building a [`ShardSet`](crate::ShardSet).
///
/// Deserializable so it can be embedded in a TOML file; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShardSetConfig {
    /// Number of shards, fixed for the life of the set. Must be at least 1.
    pub shard_count: usize,
    /// Key routing strategy.
    pub strategy: Strategy,
    /// Ring positions per shard when `strategy` is `consistent-ring`.
    pub vnodes_per_shard: u16,
}

impl ShardSetConfig {
    /// Config for `shard_count` shards with one ring position each.
    pub fn new(shard_count: usize, strategy: Strategy) -> Self {
        Self {
            shard_count,
            strategy,
            vnodes_per_shard: 1,
        }
    }

    /// Set the number of ring positions per shard.
    pub fn with_vnodes(mut self, vnodes_per_shard: u16) -> Self {
        self.vnodes_per_shard = vnodes_per_shard;
        self
    }
}

impl Default for ShardSetConfig {
    fn default() -> Self {
        Self::new(8, Strategy::Modulo)
    }
}
