//! In-memory catalog backend

use crate::error::CatalogResult;
use crate::record::{NewPlant, PlantId, PlantQuery, PlantRecord, UpdateOutcome};
use crate::store::CatalogStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Catalog held in a `BTreeMap` keyed by identifier
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    records: RwLock<BTreeMap<PlantId, PlantRecord>>,
}

impl InMemoryCatalogStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store pre-populated with `plants` at identifiers `1..=N`
    #[must_use]
    pub fn with_plants(plants: &[NewPlant]) -> Self {
        let store = Self::new();
        store.insert_all(plants);
        store
    }

    /// Snapshot of every record, ordered by identifier
    #[must_use]
    pub fn snapshot(&self) -> Vec<PlantRecord> {
        self.records.read().values().cloned().collect()
    }

    fn insert_all(&self, plants: &[NewPlant]) -> usize {
        let mut records = self.records.write();
        for (index, plant) in plants.iter().enumerate() {
            let id = PlantId::from_index(index);
            records.insert(id, plant.clone().into_record(id));
        }
        plants.len()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn query(&self, query: &PlantQuery) -> CatalogResult<Vec<PlantRecord>> {
        Ok(self
            .records
            .read()
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }

    async fn update_description(
        &self,
        id: PlantId,
        description: &str,
    ) -> CatalogResult<UpdateOutcome> {
        match self.records.write().get_mut(&id) {
            Some(record) => {
                description.clone_into(&mut record.description);
                Ok(UpdateOutcome::Updated)
            }
            None => Ok(UpdateOutcome::Missing),
        }
    }

    async fn seed(&self, plants: &[NewPlant]) -> CatalogResult<usize> {
        if !self.records.read().is_empty() {
            return Ok(0);
        }
        Ok(self.insert_all(plants))
    }

    async fn count(&self) -> CatalogResult<usize> {
        Ok(self.records.read().len())
    }
}
