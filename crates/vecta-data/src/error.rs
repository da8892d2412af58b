//! Error types for the data crate.

use vecta_trie::TrieError;

/// Errors from item and vector operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The underlying trie rejected its options.
    #[error("trie error: {0}")]
    Trie(#[from] TrieError),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for data results.
pub type DataResult<T> = Result<T, DataError>;
