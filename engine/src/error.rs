//! Error types for the Answerbook engine.

use crate::BatchIndex;
use thiserror::Error;

/// All possible errors from the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Batch errors
    #[error("batch must be a JSON array")]
    NotAnArray,

    #[error("batch must not be empty")]
    EmptyBatch,

    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: BatchIndex, reason: String },

    // Document errors
    #[error("invalid document content: {0}")]
    InvalidContent(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
