//! Plant record types and query criteria

use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, positive plant identifier
///
/// Seed catalogs assign identifiers densely starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PlantId(i64);

impl PlantId {
    /// Create identifier, rejecting zero and negative values
    ///
    /// # Errors
    /// Returns `CatalogError::InvalidRecord` if `raw < 1`
    pub fn new(raw: i64) -> CatalogResult<Self> {
        if raw < 1 {
            return Err(CatalogError::invalid_record(format!(
                "plant id must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    /// Identifier of the record at zero-based catalog `index`
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        // usize -> i64 cannot overflow for any realistic catalog
        Self(i64::try_from(index).unwrap_or(i64::MAX - 1) + 1)
    }

    /// Raw integer value
    #[inline]
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for PlantId {
    type Error = CatalogError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlantId> for i64 {
    fn from(id: PlantId) -> Self {
        id.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A persisted plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    /// Identifier
    pub id: PlantId,
    /// Display name
    pub name: String,
    /// Description text (the only field rewritten after seeding)
    pub description: String,
    /// Unit price
    pub price: f64,
}

/// A plant to be inserted at seed time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlant {
    /// Display name
    pub name: String,
    /// Initial description
    pub description: String,
    /// Unit price
    pub price: f64,
}

impl NewPlant {
    /// Create seed entry
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
        }
    }

    pub(crate) fn into_record(self, id: PlantId) -> PlantRecord {
        PlantRecord {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

/// Criteria for [`CatalogStore::query`](crate::CatalogStore::query)
///
/// All set criteria must match. Results are ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantQuery {
    /// Restrict to these identifiers
    pub ids: Option<Vec<PlantId>>,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
}

impl PlantQuery {
    /// Match every record
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match a single identifier
    #[must_use]
    pub fn by_id(id: PlantId) -> Self {
        Self {
            ids: Some(vec![id]),
            ..Self::default()
        }
    }

    /// With identifier filter
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = PlantId>) -> Self {
        self.ids = Some(ids.into_iter().collect());
        self
    }

    /// With name substring filter
    #[must_use]
    pub fn with_name_containing(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// With maximum price
    #[must_use]
    pub fn with_max_price(mut self, max: f64) -> Self {
        self.max_price = Some(max);
        self
    }

    /// Check a record against the criteria
    #[must_use]
    pub fn matches(&self, record: &PlantRecord) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&record.id) {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !fold_case(&record.name).contains(&fold_case(needle)) {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if record.price > max {
                return false;
            }
        }
        true
    }
}

/// Case folding shared by every backend's name filter
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Result of a single description update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record existed and was rewritten
    Updated,
    /// No record carries the identifier
    Missing,
}

impl UpdateOutcome {
    /// Whether a row was written
    #[inline]
    #[must_use]
    pub fn is_updated(self) -> bool {
        matches!(self, Self::Updated)
    }
}
