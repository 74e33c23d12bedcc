//! Bundled seed catalog and description variants

use crate::error::{GreenthumbError, SettingsError, VariantError};
use crate::selector::DescriptionVariants;
use greenthumb_catalog::NewPlant;
use serde::Deserialize;

const CATALOG_TOML: &str = include_str!("../resources/catalog.toml");

/// One plant entry of the catalog resource
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlantResource {
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Basic description, also the seeded description
    pub description: String,
    /// Advanced description
    pub advanced_description: String,
}

/// Parsed catalog resource
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogResource {
    /// Plants in identifier order
    pub plants: Vec<PlantResource>,
}

impl CatalogResource {
    /// The catalog shipped with the binary
    ///
    /// # Errors
    /// Returns `SettingsError::Parse` if the embedded TOML is invalid
    pub fn bundled() -> Result<Self, SettingsError> {
        Self::from_toml_str(CATALOG_TOML)
    }

    /// Parse a catalog resource
    ///
    /// # Errors
    /// Returns `SettingsError::Parse` on invalid TOML
    pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(source)?)
    }

    /// Seed entries, identifier `i + 1` for entry `i`
    #[must_use]
    pub fn seed_plants(&self) -> Vec<NewPlant> {
        self.plants
            .iter()
            .map(|p| NewPlant::new(p.name.clone(), p.description.clone(), p.price))
            .collect()
    }

    /// Basic and advanced description sets
    ///
    /// # Errors
    /// Returns `VariantError::Empty` if the resource lists no plants
    pub fn description_variants(&self) -> Result<DescriptionVariants, VariantError> {
        let basic = self.plants.iter().map(|p| p.description.clone()).collect();
        let advanced = self
            .plants
            .iter()
            .map(|p| p.advanced_description.clone())
            .collect();
        DescriptionVariants::new(basic, advanced)
    }
}

/// Load the bundled catalog's seed entries and variants in one step
///
/// # Errors
/// Returns `GreenthumbError` if the bundled resource is unusable
pub fn bundled_catalog() -> Result<(Vec<NewPlant>, DescriptionVariants), GreenthumbError> {
    let resource = CatalogResource::bundled()?;
    let variants = resource.description_variants()?;
    Ok((resource.seed_plants(), variants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::DescriptionLevel;

    #[test]
    fn bundled_resource_parses() {
        let resource = CatalogResource::bundled().unwrap();
        assert_eq!(resource.plants.len(), 8);
        assert_eq!(resource.plants[0].name, "Aloe Vera");
    }

    #[test]
    fn seeds_use_basic_descriptions() {
        let (seeds, variants) = bundled_catalog().unwrap();
        assert_eq!(seeds.len(), variants.len());
        for (seed, basic) in seeds.iter().zip(variants.for_level(DescriptionLevel::Basic)) {
            assert_eq!(&seed.description, basic);
        }
    }

    #[test]
    fn empty_resource_has_no_variants() {
        let resource = CatalogResource::from_toml_str("plants = []").unwrap();
        assert_eq!(resource.description_variants(), Err(VariantError::Empty));
    }

    #[test]
    fn invalid_resource_is_rejected() {
        assert!(CatalogResource::from_toml_str("[[plants]]\nname = 3").is_err());
    }
}
