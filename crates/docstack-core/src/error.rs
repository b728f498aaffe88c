//! Error types for the docstack core.

/// Core error type for docstack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum DocStackError {
    /// Invalid collection name.
    #[error("invalid collection name: {0:?} (must be non-empty and contain no whitespace)")]
    InvalidCollectionName(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for docstack operations.
pub type DocStackResult<T> = Result<T, DocStackError>;
