//! Testing utilities for Green Thumb workspace
//!
//! Shared test helpers, fixtures, and fakes.

#![allow(missing_docs)]

use async_trait::async_trait;
use greenthumb_catalog::{
    CatalogError, CatalogResult, CatalogStore, InMemoryCatalogStore, NewPlant, PlantId,
    PlantQuery, PlantRecord, UpdateOutcome,
};
use greenthumb_core::{
    install_defaults, AnalyticsEvent, ApplyFlow, DescriptionVariants, EventLogger,
    PLANT_DESCRIPTION_KEY,
};
use greenthumb_remote_config::{ConfigSource, ConfigValues, FetchError, FetchSettings, RemoteConfig};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const BASIC: [&str; 3] = [
    "Thick leaves; water every two weeks.",
    "Feathery fronds; keep moist.",
    "Upright leaves; tolerates neglect.",
];

pub const ADVANCED: [&str; 3] = [
    "Aloe barbadensis: gritty mix, full dry-down between waterings.",
    "Nephrolepis exaltata: 60%+ humidity, peat-based mix.",
    "Dracaena trifasciata: CAM photosynthesis, leaf-cutting propagation.",
];

pub fn sample_plants() -> Vec<NewPlant> {
    vec![
        NewPlant::new("Aloe Vera", "seed description 1", 12.0),
        NewPlant::new("Boston Fern", "seed description 2", 18.5),
        NewPlant::new("Snake Plant", "seed description 3", 22.0),
    ]
}

pub fn sample_variants() -> DescriptionVariants {
    DescriptionVariants::new(
        BASIC.iter().map(|s| s.to_string()).collect(),
        ADVANCED.iter().map(|s| s.to_string()).collect(),
    )
    .unwrap()
}

pub fn seeded_store() -> Arc<InMemoryCatalogStore> {
    Arc::new(InMemoryCatalogStore::with_plants(&sample_plants()))
}

pub fn level_values(level: &str) -> ConfigValues {
    ConfigValues::from([(PLANT_DESCRIPTION_KEY.to_string(), level.to_string())])
}

/// Config source that replays scripted responses in order
///
/// Once the script is exhausted every call fails with a network error.
#[derive(Debug, Default)]
pub struct ScriptedConfigSource {
    script: Mutex<VecDeque<Result<ConfigValues, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedConfigSource {
    pub fn new(script: impl IntoIterator<Item = Result<ConfigValues, FetchError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn returning_level(level: &str) -> Arc<Self> {
        Self::new([Ok(level_values(level))])
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Self::new([Err(error)])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for ScriptedConfigSource {
    async fn fetch_values(&self) -> Result<ConfigValues, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::network("script exhausted")))
    }
}

/// Remote config over `source` with the default level installed
pub fn remote_config(source: Arc<ScriptedConfigSource>, developer_mode: bool) -> Arc<RemoteConfig> {
    let config = Arc::new(RemoteConfig::with_source(
        source,
        FetchSettings::new(developer_mode),
    ));
    install_defaults(&config);
    config
}

pub fn apply_flow(
    source: Arc<ScriptedConfigSource>,
    developer_mode: bool,
    store: Arc<dyn CatalogStore>,
) -> ApplyFlow {
    ApplyFlow::new(remote_config(source, developer_mode), store, sample_variants())
}

/// Catalog that fails description writes for selected identifiers
#[derive(Debug)]
pub struct FlakyCatalogStore {
    inner: InMemoryCatalogStore,
    failing: BTreeSet<PlantId>,
    attempts: Mutex<Vec<PlantId>>,
}

impl FlakyCatalogStore {
    pub fn new(plants: &[NewPlant], failing: impl IntoIterator<Item = i64>) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryCatalogStore::with_plants(plants),
            failing: failing
                .into_iter()
                .map(|id| PlantId::new(id).unwrap())
                .collect(),
            attempts: Mutex::new(Vec::new()),
        })
    }

    pub fn attempts(&self) -> Vec<PlantId> {
        self.attempts.lock().clone()
    }

    pub fn snapshot(&self) -> Vec<PlantRecord> {
        self.inner.snapshot()
    }
}

#[async_trait]
impl CatalogStore for FlakyCatalogStore {
    async fn query(&self, query: &PlantQuery) -> CatalogResult<Vec<PlantRecord>> {
        self.inner.query(query).await
    }

    async fn update_description(
        &self,
        id: PlantId,
        description: &str,
    ) -> CatalogResult<UpdateOutcome> {
        self.attempts.lock().push(id);
        if self.failing.contains(&id) {
            return Err(CatalogError::invalid_record(format!("injected failure for {id}")));
        }
        self.inner.update_description(id, description).await
    }

    async fn seed(&self, plants: &[NewPlant]) -> CatalogResult<usize> {
        self.inner.seed(plants).await
    }

    async fn count(&self) -> CatalogResult<usize> {
        self.inner.count().await
    }
}

/// Event logger that keeps everything it receives
#[derive(Debug, Default)]
pub struct RecordingEventLogger {
    events: Mutex<Vec<AnalyticsEvent>>,
    properties: Mutex<Vec<(String, String)>>,
}

impl RecordingEventLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }

    pub fn properties(&self) -> Vec<(String, String)> {
        self.properties.lock().clone()
    }
}

impl EventLogger for RecordingEventLogger {
    fn log_event(&self, event: AnalyticsEvent) {
        self.events.lock().push(event);
    }

    fn set_user_property(&self, key: &str, value: &str) {
        self.properties
            .lock()
            .push((key.to_string(), value.to_string()));
    }
}
