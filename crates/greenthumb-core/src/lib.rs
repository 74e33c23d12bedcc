//! Green Thumb Core
//!
//! The storefront logic around the plant catalog:
//! - Refreshes plant descriptions from a remotely configured level
//! - Tracks the gardening experience rating and first-load flag
//! - Logs add-to-cart analytics events
//!
//! # Architecture
//!
//! ```text
//! RemoteConfig ──fetch──→ ApplyFlow::resolve ──value──→ DescriptionVariants::select
//!                                                               │
//!                                   CatalogStore ←──update_description(i + 1)──┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use greenthumb_core::{AppSettings, Storefront};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = AppSettings::load("greenthumb.toml")?;
//! let storefront = Storefront::from_settings(&settings).await?;
//!
//! let launch = storefront.launch().await?;
//! println!("applied {:?} descriptions", launch.refresh.summary.level);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod analytics;
pub mod error;
pub mod experience;
pub mod flow;
pub mod preferences;
pub mod resources;
pub mod selector;
pub mod settings;
pub mod storefront;

// Re-exports for convenience
pub use analytics::{Analytics, AnalyticsEvent, EventLogger, ParamValue, TracingEventLogger};
pub use error::{
    AnalyticsError, FlowError, GreenthumbError, GreenthumbResult, PreferenceError, SettingsError,
    VariantError,
};
pub use experience::{ExperienceLevel, ExperiencePrompt};
pub use flow::{
    install_defaults, ApplyFlow, ApplyReport, FlowState, ValueSource, WriteFailure,
    WriteFailureReason, WriteSummary,
};
pub use preferences::{
    InMemoryPreferenceStore, JsonFilePreferenceStore, PreferenceStore, Preferences,
};
pub use resources::{bundled_catalog, CatalogResource, PlantResource};
pub use selector::{
    DescriptionLevel, DescriptionVariants, DEFAULT_PLANT_DESCRIPTION_LEVEL, PLANT_DESCRIPTION_KEY,
};
pub use settings::{AppSettings, RemoteConfigSettings};
pub use storefront::{LaunchReport, Storefront};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Green Thumb core
    pub use crate::{
        AppSettings, ApplyFlow, ApplyReport, DescriptionLevel, DescriptionVariants,
        ExperienceLevel, GreenthumbError, Storefront, ValueSource,
    };
    pub use greenthumb_catalog::{CatalogStore, PlantId, PlantQuery, PlantRecord};
    pub use greenthumb_remote_config::{FetchSettings, RemoteConfig};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
