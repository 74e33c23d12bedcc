//! Remote configuration state: defaults, fetched and active snapshots

use crate::error::FetchError;
use crate::settings::FetchSettings;
use crate::source::{ConfigSource, ConfigValues};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Immutable set of values retrieved by one successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// Retrieved entries
    pub values: ConfigValues,
    /// Wall-clock time of retrieval
    pub fetched_at: DateTime<Utc>,
}

impl ConfigSnapshot {
    fn empty() -> Self {
        Self {
            values: ConfigValues::new(),
            fetched_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// How a successful [`RemoteConfig::fetch`] was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Values came from the server
    Fetched,
    /// The previous fetch is younger than the expiration; no request made
    Cached,
}

/// Result of the most recent fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastFetchStatus {
    /// No fetch attempted yet
    NoFetchYet,
    /// Last fetch succeeded (fresh or cached)
    Success,
    /// Last fetch failed
    Failure,
}

/// Diagnostic view of fetch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchInfo {
    /// Status of the latest attempt
    pub last_fetch_status: LastFetchStatus,
    /// Time of the latest network fetch that succeeded
    pub last_successful_fetch: Option<DateTime<Utc>>,
    /// Settings in force
    pub settings: FetchSettings,
}

#[derive(Debug)]
struct FetchState {
    /// Fetched but not yet activated
    pending: Option<Arc<ConfigSnapshot>>,
    /// Latest network success, used for cache reuse
    last_success: Option<(Instant, Arc<ConfigSnapshot>)>,
    status: LastFetchStatus,
}

/// Remote configuration with local defaults
///
/// Replaces a process-wide singleton: construct once and share by `Arc`.
/// Activation swaps the active snapshot atomically, so readers see either
/// the previous or the new set of values, never a mix.
pub struct RemoteConfig {
    source: Arc<dyn ConfigSource>,
    settings: RwLock<FetchSettings>,
    defaults: RwLock<Arc<ConfigValues>>,
    active: RwLock<Arc<ConfigSnapshot>>,
    state: Mutex<FetchState>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("settings", &*self.settings.read())
            .field("defaults", &*self.defaults.read())
            .field("active", &*self.active.read())
            .finish_non_exhaustive()
    }
}

impl RemoteConfig {
    /// Create config backed by `source`
    #[must_use]
    pub fn new(source: impl ConfigSource + 'static, settings: FetchSettings) -> Self {
        Self::with_source(Arc::new(source), settings)
    }

    /// Create config backed by a shared source
    #[must_use]
    pub fn with_source(source: Arc<dyn ConfigSource>, settings: FetchSettings) -> Self {
        Self {
            source,
            settings: RwLock::new(settings),
            defaults: RwLock::new(Arc::new(ConfigValues::new())),
            active: RwLock::new(Arc::new(ConfigSnapshot::empty())),
            state: Mutex::new(FetchState {
                pending: None,
                last_success: None,
                status: LastFetchStatus::NoFetchYet,
            }),
        }
    }

    /// Replace fetch settings
    pub fn set_settings(&self, settings: FetchSettings) {
        *self.settings.write() = settings;
    }

    /// Current fetch settings
    #[must_use]
    pub fn settings(&self) -> FetchSettings {
        *self.settings.read()
    }

    /// Replace the in-app default values
    pub fn set_defaults<K, V>(&self, defaults: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values: ConfigValues = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        *self.defaults.write() = Arc::new(values);
    }

    /// Fetch values, reusing the previous fetch if younger than `cache_expiration`
    ///
    /// Developer mode forces the expiration to zero. On success the values
    /// become pending until [`activate_fetched`](Self::activate_fetched).
    ///
    /// # Errors
    /// Returns the source's `FetchError`; the active snapshot is unchanged.
    pub async fn fetch(&self, cache_expiration: Duration) -> Result<FetchOutcome, FetchError> {
        let expiration = self.settings().effective_expiration(cache_expiration);

        {
            let mut state = self.state.lock();
            let fresh = state
                .last_success
                .as_ref()
                .is_some_and(|(at, _)| at.elapsed() < expiration);
            if fresh {
                state.status = LastFetchStatus::Success;
                tracing::debug!(?expiration, "remote config cache still fresh");
                return Ok(FetchOutcome::Cached);
            }
        }

        match self.source.fetch_values().await {
            Ok(values) => {
                let snapshot = Arc::new(ConfigSnapshot {
                    values,
                    fetched_at: Utc::now(),
                });
                let mut state = self.state.lock();
                state.pending = Some(Arc::clone(&snapshot));
                state.last_success = Some((Instant::now(), snapshot));
                state.status = LastFetchStatus::Success;
                tracing::debug!("remote config fetched");
                Ok(FetchOutcome::Fetched)
            }
            Err(err) => {
                self.state.lock().status = LastFetchStatus::Failure;
                Err(err)
            }
        }
    }

    /// Make the most recently fetched values active
    ///
    /// Returns `false` when there is nothing new to activate.
    pub fn activate_fetched(&self) -> bool {
        let pending = self.state.lock().pending.take();
        match pending {
            Some(snapshot) => {
                *self.active.write() = snapshot;
                true
            }
            None => false,
        }
    }

    /// Active value for `key`, else its default, else the empty string
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        if let Some(value) = self.active.read().values.get(key) {
            return value.clone();
        }
        self.defaults.read().get(key).cloned().unwrap_or_default()
    }

    /// Currently active snapshot
    #[must_use]
    pub fn active_snapshot(&self) -> Arc<ConfigSnapshot> {
        Arc::clone(&self.active.read())
    }

    /// Fetch diagnostics
    #[must_use]
    pub fn info(&self) -> FetchInfo {
        let state = self.state.lock();
        FetchInfo {
            last_fetch_status: state.status,
            last_successful_fetch: state.last_success.as_ref().map(|(_, s)| s.fetched_at),
            settings: self.settings(),
        }
    }
}
