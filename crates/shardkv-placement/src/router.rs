//! Routing strategies mapping a key to one shard index.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlacementError;
use crate::hash::fnv1a_32;
use crate::ring::Ring;

/// How keys are assigned to shards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// A single shard; every key routes to index 0.
    Fixed,
    /// `fnv1a_32(key) % shard_count`.
    ///
    /// Cheap and uniform, but changing the shard count would remap almost
    /// every key.
    #[default]
    Modulo,
    /// Consistent hash ring: a key belongs to the first shard position at or
    /// after its hash.
    ConsistentRing,
}

impl Strategy {
    /// Configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Fixed => "fixed",
            Strategy::Modulo => "modulo",
            Strategy::ConsistentRing => "consistent-ring",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Strategy::Fixed),
            "modulo" => Ok(Strategy::Modulo),
            "consistent-ring" | "consistent_ring" | "ring" => Ok(Strategy::ConsistentRing),
            other => Err(PlacementError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Deterministic key -> shard index mapping for a fixed shard table.
///
/// Built once with the shard count and never mutated afterwards, so it can
/// be shared between threads without locking.
#[derive(Debug, Clone)]
pub enum Router {
    /// Single shard.
    Fixed,
    /// Hash modulo shard count.
    Modulo {
        /// Number of shards.
        shard_count: usize,
    },
    /// Consistent hash ring over shards `0..shard_count`.
    ConsistentRing(Ring),
}

impl Router {
    /// Build a router for `shard_count` shards.
    ///
    /// `vnodes_per_shard` only applies to [`Strategy::ConsistentRing`].
    ///
    /// Fails when `shard_count` is zero, when [`Strategy::Fixed`] is asked to
    /// serve more than one shard, or when a ring would have no positions.
    pub fn new(
        strategy: Strategy,
        shard_count: usize,
        vnodes_per_shard: u16,
    ) -> Result<Self, PlacementError> {
        if shard_count == 0 {
            return Err(PlacementError::InvalidConfiguration(
                "shard count must be at least 1".to_string(),
            ));
        }

        match strategy {
            Strategy::Fixed if shard_count > 1 => Err(PlacementError::InvalidConfiguration(
                format!("fixed strategy supports exactly 1 shard, got {shard_count}"),
            )),
            Strategy::Fixed => Ok(Router::Fixed),
            Strategy::Modulo => Ok(Router::Modulo { shard_count }),
            Strategy::ConsistentRing if vnodes_per_shard == 0 => {
                Err(PlacementError::InvalidConfiguration(
                    "consistent ring needs at least 1 position per shard".to_string(),
                ))
            }
            Strategy::ConsistentRing => Ok(Router::ConsistentRing(Ring::with_shards(
                shard_count,
                vnodes_per_shard,
            ))),
        }
    }

    /// Shard index for `key`, always in `0..shard_count`.
    pub fn route(&self, key: &str) -> usize {
        match self {
            Router::Fixed => 0,
            Router::Modulo { shard_count } => fnv1a_32(key.as_bytes()) as usize % shard_count,
            // Construction guarantees a non-empty ring.
            Router::ConsistentRing(ring) => ring.owner(key).unwrap_or(0),
        }
    }

    /// The strategy this router implements.
    pub fn strategy(&self) -> Strategy {
        match self {
            Router::Fixed => Strategy::Fixed,
            Router::Modulo { .. } => Strategy::Modulo,
            Router::ConsistentRing(_) => Strategy::ConsistentRing,
        }
    }

    /// Number of shards this router distributes over.
    pub fn shard_count(&self) -> usize {
        match self {
            Router::Fixed => 1,
            Router::Modulo { shard_count } => *shard_count,
            Router::ConsistentRing(ring) => ring.shard_count(),
        }
    }

    /// The ring, when routing by consistent hashing.
    pub fn ring(&self) -> Option<&Ring> {
        match self {
            Router::ConsistentRing(ring) => Some(ring),
            _ => None,
        }
    }
}
