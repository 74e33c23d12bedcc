//! Analytics events
//!
//! Fire-and-forget: loggers return nothing and callers never wait on them.

use crate::experience::ExperienceLevel;
use greenthumb_catalog::PlantRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Event logged when a plant is added to the cart
pub const EVENT_ADD_TO_CART: &str = "add_to_cart";
/// Item identifier parameter
pub const PARAM_ITEM_ID: &str = "item_id";
/// Item name parameter
pub const PARAM_ITEM_NAME: &str = "item_name";
/// Item category parameter
pub const PARAM_ITEM_CATEGORY: &str = "item_category";
/// Quantity parameter
pub const PARAM_QUANTITY: &str = "quantity";
/// Price parameter
pub const PARAM_PRICE: &str = "price";
/// Category of every catalog item
pub const PLANTS_CATEGORY: &str = "plants";
/// User property carrying the experience rating
pub const USER_PROPERTY_GARDENING_EXPERIENCE: &str = "gardening_experience";

/// Event parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
}

/// A named event with parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    /// Event name
    pub name: String,
    /// Parameters
    pub params: BTreeMap<String, ParamValue>,
}

impl AnalyticsEvent {
    /// Create event without parameters
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Sink for analytics calls
pub trait EventLogger: Send + Sync {
    /// Record an event
    fn log_event(&self, event: AnalyticsEvent);

    /// Set a user property
    fn set_user_property(&self, key: &str, value: &str);
}

/// Emits analytics as structured `tracing` events on the `analytics` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLogger;

impl EventLogger for TracingEventLogger {
    fn log_event(&self, event: AnalyticsEvent) {
        let params = serde_json::to_string(&event.params).unwrap_or_default();
        tracing::info!(target: "analytics", event = %event.name, %params, "analytics event");
    }

    fn set_user_property(&self, key: &str, value: &str) {
        tracing::info!(target: "analytics", property = key, value, "user property");
    }
}

/// Storefront analytics calls
#[derive(Clone)]
pub struct Analytics {
    logger: Arc<dyn EventLogger>,
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics").finish_non_exhaustive()
    }
}

impl Analytics {
    /// Create over a logger
    #[must_use]
    pub fn new(logger: impl EventLogger + 'static) -> Self {
        Self::with_logger(Arc::new(logger))
    }

    /// Create over a shared logger
    #[must_use]
    pub fn with_logger(logger: Arc<dyn EventLogger>) -> Self {
        Self { logger }
    }

    /// Log that `quantity` of `plant` went into the cart
    pub fn log_add_to_cart(&self, plant: &PlantRecord, quantity: u32) {
        let event = AnalyticsEvent::new(EVENT_ADD_TO_CART)
            .with_param(PARAM_ITEM_ID, ParamValue::Int(plant.id.get()))
            .with_param(PARAM_ITEM_NAME, ParamValue::Text(plant.name.clone()))
            .with_param(PARAM_ITEM_CATEGORY, ParamValue::Text(PLANTS_CATEGORY.to_string()))
            .with_param(PARAM_QUANTITY, ParamValue::Float(f64::from(quantity)))
            .with_param(PARAM_PRICE, ParamValue::Float(plant.price));
        self.logger.log_event(event);
    }

    /// Report the user's experience rating
    pub fn set_gardening_experience(&self, level: ExperienceLevel) {
        self.logger
            .set_user_property(USER_PROPERTY_GARDENING_EXPERIENCE, level.property_value());
    }
}
