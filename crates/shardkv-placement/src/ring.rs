//! Consistent hashing ring implementation.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, warn};

use crate::hash::fnv1a_32;

/// A key whose owning shard differs between two ring states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The key that must move.
    pub key: String,
    /// The shard that owns it in the old ring.
    pub from: usize,
    /// The shard that owns it in the new ring.
    pub to: usize,
}

/// Consistent hashing ring over the 32-bit FNV-1a space.
///
/// Each shard is mapped to one or more virtual positions on the ring.
/// A key is owned by the first position at or after `fnv1a_32(key)`,
/// wrapping around to the smallest position past `u32::MAX`.
///
/// Positions are computed from the stable label `shard-{index}#{vnode}`,
/// never from anything that changes between runs.
#[derive(Debug, Clone)]
pub struct Ring {
    /// Ring position -> shard index, kept sorted for clockwise lookup.
    positions: BTreeMap<u32, usize>,
    /// Shard index -> number of positions it was added with.
    shards: BTreeMap<usize, u16>,
    /// Default number of positions per shard.
    vnodes_per_shard: u16,
}

impl Ring {
    /// Create a new empty ring.
    ///
    /// `vnodes_per_shard` is the number of positions [`Ring::add_shard`]
    /// gives each shard. One position per shard is the plain ring; more
    /// positions even out the share of the key space each shard owns.
    pub fn new(vnodes_per_shard: u16) -> Self {
        Self {
            positions: BTreeMap::new(),
            shards: BTreeMap::new(),
            vnodes_per_shard,
        }
    }

    /// Build a ring holding shards `0..shard_count`.
    pub fn with_shards(shard_count: usize, vnodes_per_shard: u16) -> Self {
        let mut ring = Self::new(vnodes_per_shard);
        for index in 0..shard_count {
            ring.add_shard(index);
        }
        ring
    }

    /// Add a shard with the default number of positions.
    pub fn add_shard(&mut self, index: usize) {
        self.add_shard_with_weight(index, self.vnodes_per_shard);
    }

    /// Add a shard with an explicit number of positions.
    ///
    /// Re-adding a shard replaces its previous positions.
    pub fn add_shard_with_weight(&mut self, index: usize, weight: u16) {
        if self.shards.contains_key(&index) {
            self.remove_shard(index);
        }

        self.shards.insert(index, weight);
        for vnode in 0..weight {
            self.claim(vnode_position(index, vnode), index);
        }
        debug!(shard = index, weight, "added shard to ring");
    }

    /// Remove a shard and all of its positions.
    pub fn remove_shard(&mut self, index: usize) {
        if self.shards.remove(&index).is_none() {
            return;
        }

        // A removed shard may have shadowed another shard on a colliding
        // position, so rebuild from the remaining shards.
        self.positions.clear();
        let shards: Vec<(usize, u16)> = self.shards.iter().map(|(&i, &w)| (i, w)).collect();
        for (shard, weight) in shards {
            for vnode in 0..weight {
                self.claim(vnode_position(shard, vnode), shard);
            }
        }
        debug!(shard = index, "removed shard from ring");
    }

    /// Shard owning `key`, or `None` if the ring is empty.
    pub fn owner(&self, key: &str) -> Option<usize> {
        self.owner_of_hash(fnv1a_32(key.as_bytes()))
    }

    /// Shard owning the ring point `hash`.
    ///
    /// Walks clockwise: the first position `>= hash`, or the smallest
    /// position when `hash` is past the last one.
    pub fn owner_of_hash(&self, hash: u32) -> Option<usize> {
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, &shard)| shard)
    }

    /// Compute which keys change owner between two ring states.
    pub fn diff<K: AsRef<str>>(old: &Ring, new: &Ring, keys: &[K]) -> Vec<Migration> {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                match (old.owner(key), new.owner(key)) {
                    (Some(from), Some(to)) if from != to => Some(Migration {
                        key: key.to_string(),
                        from,
                        to,
                    }),
                    _ => None,
                }
            })
            .collect()
    }

    /// Number of shards on the ring.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Number of occupied positions on the ring.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the ring has no shards.
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    /// Shard indices present on the ring, ascending.
    pub fn shard_indices(&self) -> Vec<usize> {
        self.shards.keys().copied().collect()
    }

    /// Ring positions in clockwise order with their owning shard.
    pub fn positions(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.positions.iter().map(|(&pos, &shard)| (pos, shard))
    }

    /// Insert a position. On collision the lower shard index keeps the point,
    /// so the table does not depend on insertion order.
    fn claim(&mut self, pos: u32, index: usize) {
        match self.positions.entry(pos) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(mut slot) => {
                let holder = *slot.get();
                if holder == index {
                    return;
                }
                warn!(position = pos, holder, shard = index, "ring position collision");
                if index < holder {
                    slot.insert(index);
                }
            }
        }
    }
}

/// Position of one virtual node: `fnv1a_32("shard-{index}#{vnode}")`.
fn vnode_position(index: usize, vnode: u16) -> u32 {
    fnv1a_32(format!("shard-{index}#{vnode}").as_bytes())
}
