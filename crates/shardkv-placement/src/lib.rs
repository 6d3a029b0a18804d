//! Key-to-shard routing for shardkv.
//!
//! A [`Router`] maps a string key to the index of exactly one shard. Three
//! strategies are available (see [`Strategy`]):
//!
//! - **fixed** — a single shard, every key routes to index 0.
//! - **modulo** — `fnv1a_32(key) % shard_count`.
//! - **consistent-ring** — shards own positions on a 32-bit hash [`Ring`];
//!   a key belongs to the first position at or after its own hash.
//!
//! Ring positions are derived from stable shard labels
//! (`shard-{index}#{vnode}`), so placement is reproducible across runs.

mod error;
mod hash;
mod ring;
mod router;

pub use error::PlacementError;
pub use hash::fnv1a_32;
pub use ring::{Migration, Ring};
pub use router::{Router, Strategy};
