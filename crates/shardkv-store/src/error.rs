//! Error types for key-value store operations.

/// Errors that can occur during store operations.
///
/// Absence of a key is not an error: lookups return `Option` or `bool`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// `set` was called for a key that is already present.
    ///
    /// Use `update` to overwrite an existing value.
    #[error("key already exists: {0}")]
    AlreadyExists(String),

    /// The empty string is not a valid key.
    #[error("key must not be empty")]
    EmptyKey,
}
