//! HTTP config source
//!
//! `GET <endpoint>` is expected to answer with a JSON document:
//!
//! ```json
//! { "entries": { "plant_description": "advanced" } }
//! ```

use crate::error::FetchError;
use crate::source::{ConfigSource, ConfigValues};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wire format of a remote config response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfigDocument {
    /// Configuration entries
    #[serde(default)]
    pub entries: ConfigValues,
}

/// Fetches configuration from an HTTP endpoint with `reqwest`
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    timeout: Duration,
}

impl HttpConfigSource {
    /// Create source for `endpoint` with a per-request timeout
    ///
    /// # Errors
    /// Returns `FetchError::Network` if the URL is invalid or the client
    /// cannot be built
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, FetchError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| FetchError::network(format!("invalid endpoint '{endpoint}': {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Configured endpoint
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    fn classify(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::network(err.to_string())
        }
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch_values(&self) -> Result<ConfigValues, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching remote config");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        let document: RemoteConfigDocument =
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        Ok(document.entries)
    }
}
