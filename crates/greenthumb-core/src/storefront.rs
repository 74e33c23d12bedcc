//! Storefront: wires catalog, remote config, preferences and analytics
//!
//! Owns the startup sequence:
//! 1. Seed the catalog if empty
//! 2. Install the default description level
//! 3. Run the description refresh flow
//! 4. Decide whether the experience prompt is due

use crate::analytics::{Analytics, TracingEventLogger};
use crate::error::GreenthumbResult;
use crate::experience::ExperiencePrompt;
use crate::flow::{install_defaults, ApplyFlow, ApplyReport};
use crate::preferences::{JsonFilePreferenceStore, Preferences};
use crate::resources::CatalogResource;
use crate::settings::AppSettings;
use greenthumb_catalog::{
    CatalogStore, NewPlant, PlantId, PlantQuery, PlantRecord, SqliteCatalogStore,
};
use greenthumb_remote_config::{ConfigSource, HttpConfigSource, RemoteConfig, UnconfiguredSource};
use std::sync::Arc;
use std::time::Duration;

/// Outcome of [`Storefront::launch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    /// Records inserted by seeding (zero if already seeded)
    pub seeded: usize,
    /// The experience rating prompt should be shown
    pub show_experience_prompt: bool,
    /// Preference backend failure hit by the first-load check
    pub preference_error: Option<String>,
    /// Description refresh result
    pub refresh: ApplyReport,
}

/// The assembled storefront
pub struct Storefront {
    store: Arc<dyn CatalogStore>,
    flow: ApplyFlow,
    preferences: Preferences,
    analytics: Analytics,
    seed: Vec<NewPlant>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("flow", &self.flow)
            .field("catalog_size", &self.seed.len())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Assemble from parts using the catalog `resource`
    ///
    /// Installs the default description level on `config`.
    ///
    /// # Errors
    /// Returns `GreenthumbError::Variant` if the resource has no plants
    pub fn new(
        config: Arc<RemoteConfig>,
        store: Arc<dyn CatalogStore>,
        preferences: Preferences,
        analytics: Analytics,
        resource: &CatalogResource,
    ) -> GreenthumbResult<Self> {
        install_defaults(&config);
        let variants = resource.description_variants()?;
        let flow = ApplyFlow::new(config, Arc::clone(&store), variants);

        Ok(Self {
            store,
            flow,
            preferences,
            analytics,
            seed: resource.seed_plants(),
        })
    }

    /// Assemble from settings: SQLite catalog, JSON preferences, HTTP remote
    /// config and tracing analytics
    ///
    /// # Errors
    /// Returns `GreenthumbError` if the database, preferences or endpoint
    /// cannot be opened
    pub async fn from_settings(settings: &AppSettings) -> GreenthumbResult<Self> {
        let remote = &settings.remote_config;
        let source: Arc<dyn ConfigSource> = match &remote.endpoint {
            Some(endpoint) => Arc::new(HttpConfigSource::new(endpoint, remote.request_timeout())?),
            None => {
                tracing::warn!("no remote config endpoint; descriptions use the default level");
                Arc::new(UnconfiguredSource)
            }
        };
        let config = Arc::new(RemoteConfig::with_source(source, remote.fetch_settings()));

        let store = Arc::new(SqliteCatalogStore::open(&settings.database_path).await?);
        let preferences =
            Preferences::new(JsonFilePreferenceStore::open(&settings.preferences_path)?);
        let analytics = Analytics::new(TracingEventLogger);

        let storefront = Self::new(
            config,
            store,
            preferences,
            analytics,
            &CatalogResource::bundled()?,
        )?;
        Ok(storefront.with_cache_expiration(remote.cache_expiration()))
    }

    /// With cache expiration for the refresh flow
    #[must_use]
    pub fn with_cache_expiration(mut self, expiration: Duration) -> Self {
        self.flow = self.flow.with_cache_expiration(expiration);
        self
    }

    /// Seed the catalog if it is empty
    ///
    /// # Errors
    /// Catalog failure
    pub async fn seed(&self) -> GreenthumbResult<usize> {
        Ok(self.store.seed(&self.seed).await?)
    }

    /// Start the storefront
    ///
    /// The refresh and the first-load check are independent: a preference
    /// failure is logged and reported, and the prompt is not shown.
    ///
    /// # Errors
    /// Catalog failure while seeding. Remote fetch failures are absorbed.
    pub async fn launch(&self) -> GreenthumbResult<LaunchReport> {
        let seeded = self.seed().await?;
        let refresh = self.refresh().await?;

        let (show_experience_prompt, preference_error) = match self.experience().on_start() {
            Ok(show) => (show, None),
            Err(err) => {
                tracing::warn!(error = %err, "first-load check failed");
                (false, Some(err.to_string()))
            }
        };

        Ok(LaunchReport {
            seeded,
            show_experience_prompt,
            preference_error,
            refresh,
        })
    }

    /// Run the description refresh flow once
    ///
    /// # Errors
    /// Returns `GreenthumbError::Flow` if a refresh is already running
    pub async fn refresh(&self) -> GreenthumbResult<ApplyReport> {
        Ok(self.flow.run().await?)
    }

    /// Plants matching `query`
    ///
    /// # Errors
    /// Catalog failure
    pub async fn plants(&self, query: &PlantQuery) -> GreenthumbResult<Vec<PlantRecord>> {
        Ok(self.store.query(query).await?)
    }

    /// Log an add-to-cart event for plant `id`
    ///
    /// Returns the plant, or `None` (and logs nothing) if it does not exist.
    ///
    /// # Errors
    /// Catalog failure
    pub async fn add_to_cart(
        &self,
        id: PlantId,
        quantity: u32,
    ) -> GreenthumbResult<Option<PlantRecord>> {
        let plant = self.store.get(id).await?;
        if let Some(plant) = &plant {
            self.analytics.log_add_to_cart(plant, quantity);
        }
        Ok(plant)
    }

    /// Experience rating prompt
    #[must_use]
    pub fn experience(&self) -> ExperiencePrompt<'_> {
        ExperiencePrompt::new(&self.preferences, &self.analytics)
    }

    /// Refresh flow
    #[must_use]
    pub fn flow(&self) -> &ApplyFlow {
        &self.flow
    }
}
