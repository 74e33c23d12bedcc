//! Where remote values come from

use crate::error::FetchError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Key/value map of configuration entries
pub type ConfigValues = BTreeMap<String, String>;

/// A server-side source of configuration values
///
/// One call is one outbound request; implementations never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Retrieve the full set of values
    async fn fetch_values(&self) -> Result<ConfigValues, FetchError>;
}

/// Source used when no endpoint is configured; every fetch fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSource;

#[async_trait]
impl ConfigSource for UnconfiguredSource {
    async fn fetch_values(&self) -> Result<ConfigValues, FetchError> {
        Err(FetchError::network("no remote config endpoint configured"))
    }
}
