//! Gardening experience rating

use crate::analytics::Analytics;
use crate::error::{AnalyticsError, GreenthumbResult};
use crate::preferences::Preferences;
use serde::{Deserialize, Serialize};

/// Fixed label set for the experience rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    /// Never kept a plant alive
    Beginner,
    /// Keeps a few plants going
    Intermediate,
    /// Green thumb
    Expert,
}

impl ExperienceLevel {
    /// All levels in display order
    pub const ALL: [ExperienceLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    /// Level at display position `index`
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Level at display position `index`, as an analytics error when out of range
    ///
    /// # Errors
    /// Returns `AnalyticsError::RatingOutOfRange` for an unknown index
    pub fn try_from_index(index: usize) -> Result<Self, AnalyticsError> {
        Self::from_index(index).ok_or(AnalyticsError::RatingOutOfRange {
            index,
            len: Self::ALL.len(),
        })
    }

    /// Display position
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Beginner => 0,
            Self::Intermediate => 1,
            Self::Expert => 2,
        }
    }

    /// Label shown to the user
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }

    /// Value reported as the analytics user property
    #[must_use]
    pub fn property_value(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

/// Experience rating prompt logic
#[derive(Debug)]
pub struct ExperiencePrompt<'a> {
    preferences: &'a Preferences,
    analytics: &'a Analytics,
}

impl<'a> ExperiencePrompt<'a> {
    /// Create prompt over shared preferences and analytics
    #[must_use]
    pub fn new(preferences: &'a Preferences, analytics: &'a Analytics) -> Self {
        Self {
            preferences,
            analytics,
        }
    }

    /// Whether the prompt must be shown on this start
    ///
    /// True only on the first start; the flag is cleared as a side effect.
    ///
    /// # Errors
    /// Preference backend failure
    pub fn on_start(&self) -> GreenthumbResult<bool> {
        if self.preferences.first_load()? {
            self.preferences.set_first_load(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Currently saved rating, preselected in the prompt
    ///
    /// # Errors
    /// Preference backend failure
    pub fn current(&self) -> GreenthumbResult<Option<ExperienceLevel>> {
        Ok(self.preferences.gardening_experience()?)
    }

    /// Save the user's choice
    ///
    /// `None` means the prompt was confirmed without a selection and nothing
    /// is saved. Otherwise the rating is persisted and reported as a user
    /// property.
    ///
    /// # Errors
    /// Preference backend failure
    pub fn save(&self, choice: Option<ExperienceLevel>) -> GreenthumbResult<()> {
        let Some(level) = choice else {
            return Ok(());
        };
        self.preferences.set_gardening_experience(level)?;
        self.analytics.set_gardening_experience(level);
        Ok(())
    }
}
