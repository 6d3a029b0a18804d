//! Error types for routing construction.

/// Errors produced while building a router or ring.
///
/// Routing itself never fails once construction succeeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// Construction parameters do not describe a usable shard table.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A strategy name could not be parsed.
    #[error("unknown routing strategy: {0:?} (expected fixed, modulo or consistent-ring)")]
    UnknownStrategy(String),
}
