//! Error types for Green Thumb core
//!
//! Provides error handling for:
//! - Description variant construction
//! - Refresh flow state transitions
//! - Preference persistence
//! - Analytics calls
//! - Settings and resource loading
//!
//! Remote fetch failures only appear here when the client cannot be built;
//! the refresh flow absorbs fetch failures and falls back to the active or
//! default value.

use crate::flow::FlowState;
use greenthumb_catalog::CatalogError;
use greenthumb_remote_config::FetchError;
use std::path::PathBuf;

/// Main Green Thumb error type
#[derive(Debug, thiserror::Error)]
pub enum GreenthumbError {
    /// Description variants are unusable
    #[error("variant error: {0}")]
    Variant(#[from] VariantError),

    /// Refresh flow rejected a trigger
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),

    /// Catalog store failed
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Remote config client could not be set up
    #[error("remote config error: {0}")]
    RemoteConfig(#[from] FetchError),

    /// Preference store failed
    #[error("preference error: {0}")]
    Preference(#[from] PreferenceError),

    /// Analytics call rejected
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),

    /// Settings could not be loaded
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Description variant errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    /// A variant set has no entries
    #[error("description variant sets must not be empty")]
    Empty,

    /// The two sets cover a different number of plants
    #[error("variant sets differ in length: basic has {basic}, advanced has {advanced}")]
    LengthMismatch { basic: usize, advanced: usize },
}

/// Refresh flow errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// Transition not permitted from the current state
    #[error("illegal flow transition: {from:?} -> {to:?}")]
    IllegalTransition { from: FlowState, to: FlowState },
}

/// Preference store errors
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file holds invalid JSON
    #[error("corrupt preference file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Stored value has the wrong type for the key
    #[error("preference '{key}' has unexpected type")]
    TypeMismatch { key: String },
}

impl PreferenceError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Analytics errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// Rating index outside the fixed label set
    #[error("experience rating {index} out of range (0..{len})")]
    RatingOutOfRange { index: usize, len: usize },
}

/// Settings loading errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// IO error reading settings
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or schema error
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for core operations
pub type GreenthumbResult<T> = Result<T, GreenthumbError>;
