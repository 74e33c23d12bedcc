//! Application settings loaded from TOML
//!
//! ```toml
//! database_path = "data/plants.db"
//! preferences_path = "data/preferences.json"
//!
//! [remote_config]
//! endpoint = "https://config.example.com/greenthumb"
//! developer_mode = false
//! cache_expiration_secs = 3600
//! request_timeout_secs = 10
//! ```

use crate::error::SettingsError;
use greenthumb_remote_config::{FetchSettings, DEFAULT_CACHE_EXPIRATION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfigSettings {
    /// Endpoint URL; `None` means every fetch falls back to defaults
    pub endpoint: Option<String>,
    /// Always refetch
    pub developer_mode: bool,
    /// Cache expiration in seconds
    pub cache_expiration_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfigSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            developer_mode: false,
            cache_expiration_secs: DEFAULT_CACHE_EXPIRATION.as_secs(),
            request_timeout_secs: 10,
        }
    }
}

impl RemoteConfigSettings {
    /// Fetch settings for the remote config client
    #[inline]
    #[must_use]
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings::new(self.developer_mode)
    }

    /// Requested cache expiration
    #[inline]
    #[must_use]
    pub fn cache_expiration(&self) -> Duration {
        Duration::from_secs(self.cache_expiration_secs)
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// SQLite catalog file
    pub database_path: PathBuf,
    /// Preference file
    pub preferences_path: PathBuf,
    /// Remote config
    pub remote_config: RemoteConfigSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("greenthumb.db"),
            preferences_path: PathBuf::from("greenthumb-preferences.json"),
            remote_config: RemoteConfigSettings::default(),
        }
    }
}

impl AppSettings {
    /// Parse settings from TOML text
    ///
    /// # Errors
    /// Returns `SettingsError::Parse` on invalid TOML or unknown value types
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    /// Read settings from `path`
    ///
    /// # Errors
    /// - `SettingsError::Io` if the file cannot be read
    /// - `SettingsError::Parse` on invalid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
