//! Error types for DDL serialization

use ddl_model::DomError;
use thiserror::Error;

/// Errors that can occur while writing DDL
#[derive(Debug, Error)]
pub enum DdlError {
    /// IO error from the underlying writer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document model error
    #[error("Document model error: {0}")]
    Model(#[from] DomError),

    /// Invalid writer configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// More nested blocks than the serializer supports
    #[error("Block nesting exceeds {max} levels")]
    NestingExhausted { max: usize },

    /// A block was closed with no block open
    #[error("No open block to close")]
    NestingUnderflow,

    /// A block was closed out of order or with the wrong kind
    #[error("Block mismatch: expected to close block at depth {expected}, open depth is {found}")]
    BlockMismatch { expected: usize, found: usize },

    /// The style collection contains a base-style cycle
    #[error("Circular base style chain at style '{0}'")]
    CircularStyle(String),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for DDL operations
pub type DdlResult<T> = std::result::Result<T, DdlError>;
