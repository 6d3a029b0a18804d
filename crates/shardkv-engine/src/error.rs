//! Error types for the engine.

/// Errors that can occur while building or using a [`ShardSet`].
///
/// [`ShardSet`]: crate::ShardSet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The shard table could not be built from the given parameters.
    #[error("placement error: {0}")]
    Placement(#[from] shardkv_placement::PlacementError),

    /// A per-key operation was rejected by its shard.
    #[error("store error: {0}")]
    Store(#[from] shardkv_store::StoreError),
}
