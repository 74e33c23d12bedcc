//! Description refresh flow
//!
//! Fetches the remote description level, resolves it with fallback, selects
//! a variant set and writes entry `i` into record `i + 1`.
//!
//! ```text
//! Idle ──run──→ Fetching ──ok / err──→ Applying ──writes──→ Done
//!                  ↑                                          │
//!                  └──────────────────run─────────────────────┘
//! ```
//!
//! There is no error state: fetch success and fetch failure both lead to
//! `Applying`, and the resolved value alone decides what is written.

use crate::error::FlowError;
use crate::selector::{
    DescriptionLevel, DescriptionVariants, DEFAULT_PLANT_DESCRIPTION_LEVEL, PLANT_DESCRIPTION_KEY,
};
use greenthumb_catalog::{CatalogStore, PlantId, UpdateOutcome};
use greenthumb_remote_config::{FetchError, FetchOutcome, RemoteConfig, DEFAULT_CACHE_EXPIRATION};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Refresh flow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    /// Never triggered
    Idle,
    /// Remote fetch in flight
    Fetching,
    /// Writing descriptions
    Applying,
    /// Last cycle finished
    Done,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: FlowState) -> Vec<FlowState> {
    use FlowState::*;
    match from {
        Idle => vec![Fetching],
        Fetching => vec![Applying],
        Applying => vec![Done],
        Done => vec![Fetching],
    }
}

/// Validates a state transition
///
/// # Errors
/// Returns `FlowError::IllegalTransition` if `to` is not reachable from `from`
pub fn validate_transition(from: FlowState, to: FlowState) -> Result<(), FlowError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(FlowError::IllegalTransition { from, to })
    }
}

/// Install the in-app default description level
pub fn install_defaults(config: &RemoteConfig) {
    config.set_defaults([(PLANT_DESCRIPTION_KEY, DEFAULT_PLANT_DESCRIPTION_LEVEL)]);
}

/// Where the applied value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// A fresh server response, now activated
    Fetched,
    /// A previous response still within the cache expiration
    Cached,
    /// The fetch failed; the active or default value was used
    Fallback,
}

/// Why a single description write did not happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteFailureReason {
    /// No record with the identifier exists
    Missing,
    /// The store returned an error
    Store(String),
}

/// A skipped description write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFailure {
    /// Target record
    pub id: PlantId,
    /// Cause
    pub reason: WriteFailureReason,
}

/// Result of the apply phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Selected variant set
    pub level: DescriptionLevel,
    /// Records whose description was written, in write order
    pub written: Vec<PlantId>,
    /// Writes that were skipped
    pub failures: Vec<WriteFailure>,
}

impl WriteSummary {
    /// Every record received its description
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of one full refresh cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Resolved `plant_description` value
    pub value: String,
    /// How the value was obtained
    pub source: ValueSource,
    /// Writes performed
    pub summary: WriteSummary,
}

/// Fetch-decide-apply orchestration
///
/// Preconditions: the catalog holds records `1..=N` where N is
/// `variants.len()`. Identifiers are not queried before writing.
pub struct ApplyFlow {
    config: Arc<RemoteConfig>,
    store: Arc<dyn CatalogStore>,
    variants: DescriptionVariants,
    cache_expiration: Duration,
    state: Mutex<FlowState>,
}

impl std::fmt::Debug for ApplyFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyFlow")
            .field("config", &self.config)
            .field("catalog_size", &self.variants.len())
            .field("cache_expiration", &self.cache_expiration)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ApplyFlow {
    /// Create flow with the default one hour cache expiration
    #[must_use]
    pub fn new(
        config: Arc<RemoteConfig>,
        store: Arc<dyn CatalogStore>,
        variants: DescriptionVariants,
    ) -> Self {
        Self {
            config,
            store,
            variants,
            cache_expiration: DEFAULT_CACHE_EXPIRATION,
            state: Mutex::new(FlowState::Idle),
        }
    }

    /// With cache expiration
    #[inline]
    #[must_use]
    pub fn with_cache_expiration(mut self, expiration: Duration) -> Self {
        self.cache_expiration = expiration;
        self
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> FlowState {
        *self.state.lock()
    }

    /// Shared remote config
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Arc<RemoteConfig> {
        &self.config
    }

    /// Run one refresh cycle
    ///
    /// Fetch failures never surface here: they resolve to the active or
    /// default value and the cycle still reaches `Done`.
    ///
    /// If the returned future is dropped before completion the state
    /// reverts to what it was before the trigger, so the flow can run again.
    ///
    /// # Errors
    /// Returns `FlowError::IllegalTransition` if a cycle is already in
    /// progress
    pub async fn run(&self) -> Result<ApplyReport, FlowError> {
        let previous = self.transition(FlowState::Fetching)?;
        let guard = CycleGuard {
            state: &self.state,
            restore: Some(previous),
        };

        let fetched = self.config.fetch(self.cache_expiration).await;
        let source = self.resolve(fetched);

        self.transition(FlowState::Applying)?;
        let value = self.config.get_string(PLANT_DESCRIPTION_KEY);
        tracing::debug!(plant_description = %value, ?source, "resolved description level");

        let summary = self.apply(&value).await;

        self.transition(FlowState::Done)?;
        guard.complete();
        tracing::info!(
            level = ?summary.level,
            written = summary.written.len(),
            failed = summary.failures.len(),
            "plant descriptions refreshed"
        );

        Ok(ApplyReport {
            value,
            source,
            summary,
        })
    }

    /// Fold a fetch result into the active config
    ///
    /// Success activates the fetched values; failure is logged and absorbed.
    pub fn resolve(&self, fetched: Result<FetchOutcome, FetchError>) -> ValueSource {
        match fetched {
            Ok(FetchOutcome::Fetched) => {
                self.config.activate_fetched();
                ValueSource::Fetched
            }
            Ok(FetchOutcome::Cached) => {
                self.config.activate_fetched();
                ValueSource::Cached
            }
            Err(err) => {
                tracing::warn!(error = %err, "remote config fetch failed, using active values");
                ValueSource::Fallback
            }
        }
    }

    /// Write the variant set selected by `value` into records `1..=N`
    ///
    /// Writes are sequential. A failed or missing write is recorded and the
    /// loop moves on to the next record; nothing is retried.
    pub async fn apply(&self, value: &str) -> WriteSummary {
        let level = DescriptionLevel::from_value(value);
        let descriptions = self.variants.for_level(level);

        let mut written = Vec::with_capacity(descriptions.len());
        let mut failures = Vec::new();

        for (index, description) in descriptions.iter().enumerate() {
            let id = PlantId::from_index(index);
            match self.store.update_description(id, description).await {
                Ok(UpdateOutcome::Updated) => written.push(id),
                Ok(UpdateOutcome::Missing) => {
                    tracing::warn!(%id, "no plant record for description");
                    failures.push(WriteFailure {
                        id,
                        reason: WriteFailureReason::Missing,
                    });
                }
                Err(err) => {
                    tracing::warn!(%id, error = %err, "description write failed");
                    failures.push(WriteFailure {
                        id,
                        reason: WriteFailureReason::Store(err.to_string()),
                    });
                }
            }
        }

        WriteSummary {
            level,
            written,
            failures,
        }
    }

    /// Move to `to`, returning the state left
    fn transition(&self, to: FlowState) -> Result<FlowState, FlowError> {
        let mut state = self.state.lock();
        validate_transition(*state, to)?;
        tracing::debug!(from = ?*state, ?to, "flow transition");
        Ok(std::mem::replace(&mut *state, to))
    }
}

/// Restores the pre-trigger state if a cycle is abandoned mid-way
struct CycleGuard<'a> {
    state: &'a Mutex<FlowState>,
    restore: Option<FlowState>,
}

impl CycleGuard<'_> {
    fn complete(mut self) {
        self.restore = None;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            let mut state = self.state.lock();
            tracing::warn!(from = ?*state, to = ?previous, "refresh cycle abandoned");
            *state = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenthumb_catalog::{InMemoryCatalogStore, NewPlant, PlantQuery};
    use greenthumb_remote_config::{FetchSettings, UnconfiguredSource};

    const ALL_STATES: [FlowState; 4] = [
        FlowState::Idle,
        FlowState::Fetching,
        FlowState::Applying,
        FlowState::Done,
    ];

    fn variants() -> DescriptionVariants {
        DescriptionVariants::new(
            vec!["basic one".into(), "basic two".into()],
            vec!["advanced one".into(), "advanced two".into()],
        )
        .unwrap()
    }

    fn store() -> Arc<InMemoryCatalogStore> {
        Arc::new(InMemoryCatalogStore::with_plants(&[
            NewPlant::new("Aloe", "seed one", 10.0),
            NewPlant::new("Basil", "seed two", 4.0),
        ]))
    }

    fn offline_flow(store: Arc<InMemoryCatalogStore>) -> ApplyFlow {
        let config = Arc::new(RemoteConfig::new(UnconfiguredSource, FetchSettings::default()));
        install_defaults(&config);
        ApplyFlow::new(config, store, variants())
    }

    #[test]
    fn transitions_follow_cycle() {
        assert!(validate_transition(FlowState::Idle, FlowState::Fetching).is_ok());
        assert!(validate_transition(FlowState::Fetching, FlowState::Applying).is_ok());
        assert!(validate_transition(FlowState::Applying, FlowState::Done).is_ok());
        assert!(validate_transition(FlowState::Done, FlowState::Fetching).is_ok());

        assert!(validate_transition(FlowState::Idle, FlowState::Applying).is_err());
        assert!(validate_transition(FlowState::Fetching, FlowState::Fetching).is_err());
        assert!(validate_transition(FlowState::Applying, FlowState::Fetching).is_err());
    }

    #[test]
    fn validate_agrees_with_allowed() {
        for from in ALL_STATES {
            for to in ALL_STATES {
                let allowed = allowed_transitions(from).contains(&to);
                assert_eq!(validate_transition(from, to).is_ok(), allowed);
            }
        }
    }

    #[tokio::test]
    async fn offline_run_falls_back_to_basic() {
        let store = store();
        let flow = offline_flow(Arc::clone(&store));

        let report = flow.run().await.unwrap();

        assert_eq!(report.value, "basic");
        assert_eq!(report.source, ValueSource::Fallback);
        assert_eq!(report.summary.level, DescriptionLevel::Basic);
        assert!(report.summary.is_complete());
        assert_eq!(flow.state(), FlowState::Done);

        let descriptions: Vec<String> = store
            .query(&PlantQuery::all())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.description)
            .collect();
        assert_eq!(descriptions, vec!["basic one", "basic two"]);
    }

    #[tokio::test]
    async fn done_can_be_retriggered() {
        let flow = offline_flow(store());
        flow.run().await.unwrap();
        flow.run().await.unwrap();
        assert_eq!(flow.state(), FlowState::Done);
    }

    #[tokio::test]
    async fn apply_records_missing_rows_and_continues() {
        let store = Arc::new(InMemoryCatalogStore::with_plants(&[NewPlant::new(
            "Aloe", "seed", 10.0,
        )]));
        let flow = offline_flow(Arc::clone(&store));

        let summary = flow.apply("pro").await;

        assert_eq!(summary.level, DescriptionLevel::Advanced);
        assert_eq!(summary.written, vec![PlantId::new(1).unwrap()]);
        assert_eq!(
            summary.failures,
            vec![WriteFailure {
                id: PlantId::new(2).unwrap(),
                reason: WriteFailureReason::Missing,
            }]
        );
        assert_eq!(store.snapshot()[0].description, "advanced one");
    }

    #[test]
    fn resolve_failure_is_fallback() {
        let flow = offline_flow(store());
        let source = flow.resolve(Err(FetchError::Status(500)));
        assert_eq!(source, ValueSource::Fallback);
        assert_eq!(flow.config().get_string(PLANT_DESCRIPTION_KEY), "basic");
    }
}
