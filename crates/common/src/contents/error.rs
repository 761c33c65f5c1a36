//! Error types for namespace and backend operations.

/// Errors raised by backends and passed through the router unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ContentsError {
    /// Path does not resolve to an existing document or directory
    #[error("not found: {0}")]
    NotFound(String),

    /// First path segment does not name a registered backend
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Target already exists where uniqueness is required
    #[error("conflict: {0}")]
    Conflict(String),

    /// Malformed save payload
    #[error("invalid model: {0}")]
    Validation(String),

    /// Operation not available on this backend
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization error
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A middleware hook failed; the enclosing operation was aborted
    #[error("middleware '{name}' failed: {source}")]
    Middleware {
        name: String,
        #[source]
        source: Box<ContentsError>,
    },
}

/// Result type alias for namespace operations.
pub type Result<T> = std::result::Result<T, ContentsError>;
