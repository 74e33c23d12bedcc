//! Description variant selection
//!
//! A two-way branch, not a lookup table: only the literal default level
//! selects the basic set; every other value selects the advanced set.

use crate::error::VariantError;

/// Remote config key holding the description level
pub const PLANT_DESCRIPTION_KEY: &str = "plant_description";

/// Default description level
pub const DEFAULT_PLANT_DESCRIPTION_LEVEL: &str = "basic";

/// Which variant set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptionLevel {
    /// Introductory descriptions
    Basic,
    /// Detailed descriptions
    Advanced,
}

impl DescriptionLevel {
    /// Level for a resolved config value
    #[inline]
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value == DEFAULT_PLANT_DESCRIPTION_LEVEL {
            Self::Basic
        } else {
            Self::Advanced
        }
    }
}

/// The two description sets, one entry per catalog record
///
/// Entry `i` belongs to the record with identifier `i + 1`. The catalog size
/// N is fixed here: both sets are non-empty and equally long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionVariants {
    basic: Vec<String>,
    advanced: Vec<String>,
}

impl DescriptionVariants {
    /// Create variant sets
    ///
    /// # Errors
    /// - `VariantError::Empty` if either set is empty
    /// - `VariantError::LengthMismatch` if the sets differ in length
    pub fn new(basic: Vec<String>, advanced: Vec<String>) -> Result<Self, VariantError> {
        if basic.is_empty() || advanced.is_empty() {
            return Err(VariantError::Empty);
        }
        if basic.len() != advanced.len() {
            return Err(VariantError::LengthMismatch {
                basic: basic.len(),
                advanced: advanced.len(),
            });
        }
        Ok(Self { basic, advanced })
    }

    /// Catalog size N
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.basic.len()
    }

    /// False by construction
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.basic.is_empty()
    }

    /// Set for a level
    #[inline]
    #[must_use]
    pub fn for_level(&self, level: DescriptionLevel) -> &[String] {
        match level {
            DescriptionLevel::Basic => &self.basic,
            DescriptionLevel::Advanced => &self.advanced,
        }
    }

    /// Set for a resolved config value
    #[inline]
    #[must_use]
    pub fn select(&self, value: &str) -> &[String] {
        self.for_level(DescriptionLevel::from_value(value))
    }
}
