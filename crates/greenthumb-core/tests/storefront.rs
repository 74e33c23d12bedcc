//! Storefront startup, experience rating and analytics against on-disk stores.

use greenthumb_catalog::{PlantId, PlantQuery, SqliteCatalogStore};
use greenthumb_core::{
    Analytics, AppSettings, CatalogResource, DescriptionLevel, ExperienceLevel, ParamValue,
    PreferenceError, PreferenceStore, Preferences, Storefront, ValueSource,
};
use greenthumb_remote_config::FetchError;
use greenthumb_test_utils::{remote_config, RecordingEventLogger, ScriptedConfigSource};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;

async fn storefront(
    source: Arc<ScriptedConfigSource>,
    logger: Arc<RecordingEventLogger>,
) -> Storefront {
    let store = Arc::new(SqliteCatalogStore::open_in_memory().unwrap());
    Storefront::new(
        remote_config(source, false),
        store,
        Preferences::in_memory(),
        Analytics::with_logger(logger),
        &CatalogResource::bundled().unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn first_launch_seeds_prompts_and_refreshes() {
    let logger = RecordingEventLogger::new();
    let front = storefront(ScriptedConfigSource::returning_level("pro"), logger).await;

    let launch = front.launch().await.unwrap();

    assert_eq!(launch.seeded, 8);
    assert!(launch.show_experience_prompt);
    assert_eq!(launch.preference_error, None);
    assert_eq!(launch.refresh.source, ValueSource::Fetched);
    assert_eq!(launch.refresh.summary.level, DescriptionLevel::Advanced);
    assert!(launch.refresh.summary.is_complete());

    let resource = CatalogResource::bundled().unwrap();
    let plants = front.plants(&PlantQuery::all()).await.unwrap();
    let expected: Vec<&str> = resource
        .plants
        .iter()
        .map(|p| p.advanced_description.as_str())
        .collect();
    let actual: Vec<&str> = plants.iter().map(|p| p.description.as_str()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn second_launch_skips_seed_and_prompt() {
    let source = ScriptedConfigSource::new([]);
    let front = storefront(source, RecordingEventLogger::new()).await;

    front.launch().await.unwrap();
    let second = front.launch().await.unwrap();

    assert_eq!(second.seeded, 0);
    assert!(!second.show_experience_prompt);
    assert_eq!(second.refresh.source, ValueSource::Fallback);
    assert_eq!(second.refresh.summary.level, DescriptionLevel::Basic);
}

#[tokio::test]
async fn rating_is_saved_and_reported() {
    let logger = RecordingEventLogger::new();
    let front = storefront(ScriptedConfigSource::new([]), logger.clone()).await;

    front.experience().save(None).unwrap();
    assert!(logger.properties().is_empty());

    front
        .experience()
        .save(Some(ExperienceLevel::Intermediate))
        .unwrap();

    assert_eq!(
        front.experience().current().unwrap(),
        Some(ExperienceLevel::Intermediate)
    );
    assert_eq!(
        logger.properties(),
        vec![(
            "gardening_experience".to_string(),
            "intermediate".to_string()
        )]
    );
}

#[tokio::test]
async fn add_to_cart_logs_event_for_known_plant_only() {
    let logger = RecordingEventLogger::new();
    let front = storefront(
        ScriptedConfigSource::failing(FetchError::Status(503)),
        logger.clone(),
    )
    .await;
    front.seed().await.unwrap();

    let plant = front
        .add_to_cart(PlantId::new(3).unwrap(), 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plant.name, "Snake Plant");

    let missing = front.add_to_cart(PlantId::new(99).unwrap(), 1).await.unwrap();
    assert!(missing.is_none());

    let events = logger.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "add_to_cart");
    assert_eq!(events[0].params["item_id"], ParamValue::Int(3));
    assert_eq!(events[0].params["quantity"], ParamValue::Float(2.0));
    assert_eq!(events[0].params["price"], ParamValue::Float(22.0));
}

#[tokio::test]
async fn from_settings_without_endpoint_uses_default_level() {
    let dir = tempfile::tempdir().unwrap();
    let settings = AppSettings::from_toml_str(&format!(
        "database_path = {:?}\npreferences_path = {:?}\n",
        dir.path().join("plants.db"),
        dir.path().join("prefs.json"),
    ))
    .unwrap();

    let front = Storefront::from_settings(&settings).await.unwrap();
    let launch = front.launch().await.unwrap();

    assert_eq!(launch.refresh.source, ValueSource::Fallback);
    assert_eq!(launch.refresh.summary.level, DescriptionLevel::Basic);
    assert!(dir.path().join("plants.db").exists());
    assert!(dir.path().join("prefs.json").exists());
}

/// Preference backend whose disk is gone
struct UnreadablePreferenceStore;

impl PreferenceStore for UnreadablePreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<Value>, PreferenceError> {
        Err(PreferenceError::io_error(
            "prefs.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ))
    }

    fn set(&self, key: &str, _value: Value) -> Result<(), PreferenceError> {
        self.get(key).map(|_| ())
    }
}

#[tokio::test]
async fn preference_failure_does_not_block_refresh() {
    let store = Arc::new(SqliteCatalogStore::open_in_memory().unwrap());
    let front = Storefront::new(
        remote_config(ScriptedConfigSource::returning_level("pro"), false),
        store,
        Preferences::new(UnreadablePreferenceStore),
        Analytics::with_logger(RecordingEventLogger::new()),
        &CatalogResource::bundled().unwrap(),
    )
    .unwrap();

    let launch = front.launch().await.unwrap();

    assert!(!launch.show_experience_prompt);
    assert!(launch.preference_error.unwrap().contains("denied"));
    assert_eq!(launch.refresh.summary.level, DescriptionLevel::Advanced);
    assert!(launch.refresh.summary.is_complete());

    let resource = CatalogResource::bundled().unwrap();
    let plants = front.plants(&PlantQuery::all()).await.unwrap();
    assert_eq!(plants[0].description, resource.plants[0].advanced_description);
}
