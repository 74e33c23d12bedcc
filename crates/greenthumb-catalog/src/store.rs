//! The record store contract consumed by the refresh flow and display code

use crate::error::CatalogResult;
use crate::record::{NewPlant, PlantId, PlantQuery, PlantRecord, UpdateOutcome};
use async_trait::async_trait;

/// Plant record store
///
/// Implementations own record persistence. Callers outside seeding only ever
/// rewrite the description field.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Read records matching `query`, ordered by identifier
    async fn query(&self, query: &PlantQuery) -> CatalogResult<Vec<PlantRecord>>;

    /// Rewrite the description of record `id`
    ///
    /// Leaves every other field untouched. Returns
    /// [`UpdateOutcome::Missing`] when no record carries `id`.
    async fn update_description(&self, id: PlantId, description: &str)
        -> CatalogResult<UpdateOutcome>;

    /// Insert `plants` with identifiers `1..=N` if the store is empty
    ///
    /// Returns the number of inserted records (zero when already seeded).
    async fn seed(&self, plants: &[NewPlant]) -> CatalogResult<usize>;

    /// Number of records
    async fn count(&self) -> CatalogResult<usize>;

    /// Fetch a single record
    async fn get(&self, id: PlantId) -> CatalogResult<Option<PlantRecord>> {
        Ok(self.query(&PlantQuery::by_id(id)).await?.into_iter().next())
    }
}
