//! Error types for the recall store.

use thiserror::Error;

/// Errors that can occur while recording or persisting failures.
#[derive(Debug, Error)]
pub enum RecallError {
    /// A failure was recorded without an embedding.
    #[error("embedding must not be empty")]
    EmptyEmbedding,

    /// Serialization of the store failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error reading or writing the store file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for recall operations.
pub type Result<T> = std::result::Result<T, RecallError>;
