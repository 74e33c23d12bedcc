//! SQLite backend behaviour against a real database file.

use greenthumb_catalog::{
    CatalogStore, NewPlant, PlantId, PlantQuery, PlantRecord, SqliteCatalogStore, UpdateOutcome,
};
use pretty_assertions::assert_eq;

fn seed_plants() -> Vec<NewPlant> {
    vec![
        NewPlant::new("Aloe Vera", "Succulent with thick leaves.", 12.0),
        NewPlant::new("Boston Fern", "Feathery fronds.", 18.5),
        NewPlant::new("Snake Plant", "Upright leaves.", 22.0),
    ]
}

#[tokio::test]
async fn seed_and_query_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("plants.db");

    {
        let store = SqliteCatalogStore::open(&path).await.unwrap();
        assert_eq!(store.seed(&seed_plants()).await.unwrap(), 3);
    }

    let reopened = SqliteCatalogStore::open(&path).await.unwrap();
    assert_eq!(reopened.count().await.unwrap(), 3);
    assert_eq!(reopened.seed(&seed_plants()).await.unwrap(), 0);

    let records = reopened.query(&PlantQuery::all()).await.unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(records[1].name, "Boston Fern");
}

#[tokio::test]
async fn update_description_leaves_other_columns() {
    let store = SqliteCatalogStore::open_in_memory().unwrap();
    store.seed(&seed_plants()).await.unwrap();
    let id = PlantId::new(3).unwrap();

    let outcome = store
        .update_description(id, "Tolerates low light and neglect.")
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Updated);

    assert_eq!(
        store.get(id).await.unwrap(),
        Some(PlantRecord {
            id,
            name: "Snake Plant".to_string(),
            description: "Tolerates low light and neglect.".to_string(),
            price: 22.0,
        })
    );
}

#[tokio::test]
async fn update_unknown_id_reports_missing() {
    let store = SqliteCatalogStore::open_in_memory().unwrap();
    store.seed(&seed_plants()).await.unwrap();

    let outcome = store
        .update_description(PlantId::new(42).unwrap(), "nothing here")
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Missing);
}

#[tokio::test]
async fn query_criteria_are_applied_in_sql() {
    let store = SqliteCatalogStore::open_in_memory().unwrap();
    store.seed(&seed_plants()).await.unwrap();

    let cheap = store
        .query(&PlantQuery::all().with_max_price(20.0))
        .await
        .unwrap();
    assert_eq!(cheap.len(), 2);

    let named = store
        .query(&PlantQuery::all().with_name_containing("plant"))
        .await
        .unwrap();
    assert_eq!(named.len(), 1);
    assert_eq!(named[0].name, "Snake Plant");

    let by_ids = store
        .query(&PlantQuery::all().with_ids([PlantId::new(1).unwrap(), PlantId::new(3).unwrap()]))
        .await
        .unwrap();
    let names: Vec<&str> = by_ids.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Aloe Vera", "Snake Plant"]);
}
