//! Single-threaded behaviour of the shard set across all layouts.

use std::collections::HashSet;

use shardkv_placement::Strategy;
use shardkv_store::{KeyValueStore, StoreError};

use super::helpers::{LAYOUTS, key_set, random_keys, shard_set};
use crate::shard_set::ShardSet;

#[test]
fn test_three_shard_modulo_scenario() {
    let cache = ShardSet::new(3, Strategy::Modulo).unwrap();
    cache.set("a", 1).unwrap();
    cache.set("b", 2).unwrap();
    cache.set("c", 3).unwrap();

    let expected: HashSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(key_set(cache.keys()), expected);
    assert_eq!(cache.get("a"), Some(1));

    assert!(cache.delete("b"));

    let expected: HashSet<String> = ["a", "c"].iter().map(|s| s.to_string()).collect();
    assert_eq!(key_set(cache.keys()), expected);
}

#[test]
fn test_set_then_get() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        for i in 0..100 {
            cache.set(&format!("key-{i}"), i).unwrap();
        }
        for i in 0..100 {
            assert_eq!(
                cache.get(&format!("key-{i}")),
                Some(i),
                "{strategy}/{shards}: key-{i}"
            );
        }
    }
}

#[test]
fn test_second_set_fails_and_keeps_first_value() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        cache.set("k", "v1").unwrap();

        let err = cache.set("k", "v2").unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists("k".to_string()));
        assert_eq!(cache.get("k"), Some("v1"), "{strategy}/{shards}");
    }
}

#[test]
fn test_update_overwrites() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        cache.update("k", 1).unwrap();
        cache.update("k", 2).unwrap();
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);

        // A key written by update is visible to set's existence check.
        assert!(cache.set("k", 3).is_err());
    }
}

#[test]
fn test_delete_absent_leaves_set_unchanged() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        cache.set("present", 1).unwrap();

        assert!(!cache.delete("absent"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("present"), Some(1));

        assert!(cache.delete("present"));
        assert_eq!(cache.get("present"), None);
        assert!(cache.is_empty());
    }
}

#[test]
fn test_contains_true_iff_present() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        assert!(!cache.contains("x"));
        cache.set("x", 0u8).unwrap();
        assert!(cache.contains("x"), "{strategy}/{shards}");
        cache.delete("x");
        assert!(!cache.contains("x"));
    }
}

#[test]
fn test_keys_count_matches_for_every_layout() {
    let keys = random_keys(2_000, 7);
    let expected: HashSet<String> = keys.iter().cloned().collect();

    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        for (i, key) in keys.iter().enumerate() {
            cache.set(key, i).unwrap();
        }

        let listed = cache.keys();
        assert_eq!(listed.len(), keys.len(), "{strategy}/{shards}");
        assert_eq!(listed.len(), cache.len());
        assert!(listed.iter().all(|k| !k.is_empty()));
        assert_eq!(key_set(listed), expected);
    }
}

#[test]
fn test_empty_set_has_no_keys() {
    let cache: ShardSet<i32> = shard_set(Strategy::Modulo, 8);
    assert!(cache.keys().is_empty());
    assert_eq!(cache.populations(), vec![0; 8]);
}

#[test]
fn test_entries_live_in_routed_shard() {
    for (strategy, shards) in LAYOUTS {
        let cache = shard_set(strategy, shards);
        let keys = random_keys(500, 3);
        let mut expected = vec![0usize; shards];
        for key in &keys {
            cache.set(key, ()).unwrap();
            expected[cache.shard_for(key)] += 1;
        }
        assert_eq!(cache.populations(), expected, "{strategy}/{shards}");
    }
}

#[test]
fn test_accessors() {
    let cache: ShardSet<()> = shard_set(Strategy::ConsistentRing, 5);
    assert_eq!(cache.shard_count(), 5);
    assert_eq!(cache.strategy(), Strategy::ConsistentRing);
    assert_eq!(cache.router().shard_count(), 5);
    assert!(cache.router().ring().is_some());

    let debug = format!("{cache:?}");
    assert!(debug.contains("ShardSet"));
}
