use std::path::PathBuf;

use vecta_data::DataError;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing exists at the resolved location.
    #[error("nothing stored at {0}")]
    NotFound(PathBuf),

    /// The retrieval address has too few parts for this store.
    #[error("{retrieval} is malformed: {reason}")]
    MalformedRetrieval { retrieval: String, reason: String },

    /// The store does not support this direction of I/O.
    #[error("{op} is not implemented for the {store} store")]
    NotImplemented { op: &'static str, store: &'static str },

    /// No store is registered under this name.
    #[error("unknown store: {0}")]
    UnknownStore(String),

    /// `out` was called before any vector was swapped in.
    #[error("no vector swapped into the store")]
    NoVector,

    /// Encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Item or vector level failure.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// I/O error from the underlying destination.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
