//! Error types for the trie crate.

use thiserror::Error;

/// Errors produced when constructing a trie.
///
/// Every runtime operation on a built trie is infallible: rejected inserts
/// and absent deletes report `false`/`None` rather than an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A construction option was out of range.
    #[error("invalid trie option {name}: {reason}")]
    InvalidOption {
        name: &'static str,
        reason: String,
    },
}

/// Convenience alias for trie results.
pub type TrieResult<T> = Result<T, TrieError>;
