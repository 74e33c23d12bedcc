//! Error types for the catalog store

/// Errors raised by catalog backends
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// SQLite reported an error
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Filesystem error while opening the store
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking task panicked or was cancelled
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A record violated a catalog invariant
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl CatalogError {
    /// Create an invalid record error
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord(message.into())
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
