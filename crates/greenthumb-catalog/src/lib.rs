//! Green Thumb Catalog
//!
//! The record store that owns plant persistence.
//!
//! # Core Operations
//!
//! - **Query**: criteria-based read of `id`, `name`, `description`, `price`
//! - **Update**: rewrite the description of a single record by identifier
//! - **Seed**: populate an empty store with the fixed seed catalog
//!
//! Two backends implement [`CatalogStore`]: [`InMemoryCatalogStore`] for tests
//! and embedding, and [`SqliteCatalogStore`] for on-disk persistence.
//!
//! # Example
//!
//! ```rust,ignore
//! use greenthumb_catalog::{CatalogStore, NewPlant, PlantId, PlantQuery, SqliteCatalogStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteCatalogStore::open("plants.db").await?;
//! store.seed(&[NewPlant::new("Aloe", "A succulent.", 12.0)]).await?;
//!
//! store.update_description(PlantId::new(1)?, "Thick, fleshy leaves.").await?;
//! let plants = store.query(&PlantQuery::all()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod record;
pub mod sqlite;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalogStore;
pub use record::{NewPlant, PlantId, PlantQuery, PlantRecord, UpdateOutcome};
pub use sqlite::SqliteCatalogStore;
pub use store::CatalogStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
