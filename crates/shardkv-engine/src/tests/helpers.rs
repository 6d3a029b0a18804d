//! Shared test utilities for shardkv-engine tests.

use std::collections::HashSet;

use shardkv_placement::Strategy;

use crate::config::ShardSetConfig;
use crate::shard_set::ShardSet;

/// Every legal (strategy, shard count) pair exercised by the scenario tests.
pub const LAYOUTS: [(Strategy, usize); 7] = [
    (Strategy::Fixed, 1),
    (Strategy::Modulo, 1),
    (Strategy::Modulo, 4),
    (Strategy::Modulo, 16),
    (Strategy::ConsistentRing, 1),
    (Strategy::ConsistentRing, 4),
    (Strategy::ConsistentRing, 16),
];

/// Build a shard set; ring layouts get 32 positions per shard.
pub fn shard_set<V: Clone + Send + Sync>(strategy: Strategy, shards: usize) -> ShardSet<V> {
    ShardSet::from_config(&ShardSetConfig::new(shards, strategy).with_vnodes(32)).unwrap()
}

/// Deterministic, pseudo-random alphanumeric keys of length 10.
pub fn random_keys(count: usize, seed: u32) -> Vec<String> {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    let mut state = seed ^ 0xDEAD_BEEF;
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key: String = (0..10)
            .map(|_| {
                state = state.wrapping_mul(1103515245).wrapping_add(12345);
                CHARSET[(state >> 16) as usize % CHARSET.len()] as char
            })
            .collect();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

/// Collect keys into a set, asserting there were no duplicates.
pub fn key_set(keys: Vec<String>) -> HashSet<String> {
    let len = keys.len();
    let set: HashSet<String> = keys.into_iter().collect();
    assert_eq!(set.len(), len, "keys() returned duplicates");
    set
}
