//! Fetch error taxonomy

use std::time::Duration;

/// Failure to retrieve remote configuration
///
/// The active snapshot is never modified when a fetch fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection could not be established or was interrupted
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Server answered with a non-success status
    #[error("remote config returned status {0}")]
    Status(u16),

    /// Response body was not a valid config document
    #[error("malformed remote config: {0}")]
    Decode(String),
}

impl FetchError {
    /// Create network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Check if the failure was a timeout
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
