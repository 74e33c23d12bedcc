//! Fetch settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache expiration used when the caller has no stronger opinion (one hour)
pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(3600);

/// Settings governing fetch behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSettings {
    /// Developer mode: every fetch goes to the server
    pub developer_mode: bool,
}

impl FetchSettings {
    /// Create settings
    #[inline]
    #[must_use]
    pub fn new(developer_mode: bool) -> Self {
        Self { developer_mode }
    }

    /// Expiration actually applied to a fetch requesting `requested`
    ///
    /// Developer mode forces zero so cached values are never reused.
    #[inline]
    #[must_use]
    pub fn effective_expiration(&self, requested: Duration) -> Duration {
        if self.developer_mode {
            Duration::ZERO
        } else {
            requested
        }
    }
}
