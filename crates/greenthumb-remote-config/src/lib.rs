//! Green Thumb Remote Config
//!
//! Named string settings with local defaults that a server may override at
//! runtime.
//!
//! # Lifecycle
//!
//! ```text
//! set_defaults ─→ fetch(cache_expiration) ─→ pending snapshot ─→ activate_fetched ─→ active snapshot
//!                       │                                                                ↑
//!                       └── cached snapshot still fresh: no network ─────────────────────┘
//! ```
//!
//! Reads via [`RemoteConfig::get_string`] only ever see the active snapshot,
//! falling back to the defaults. A failed fetch leaves the active snapshot
//! untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use greenthumb_remote_config::{FetchSettings, HttpConfigSource, RemoteConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = HttpConfigSource::new("https://config.example.com/v1", Duration::from_secs(10))?;
//! let config = RemoteConfig::new(source, FetchSettings::default());
//! config.set_defaults([("plant_description", "basic")]);
//!
//! if config.fetch(Duration::from_secs(3600)).await.is_ok() {
//!     config.activate_fetched();
//! }
//! let level = config.get_string("plant_description");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod http;
pub mod remote;
pub mod settings;
pub mod source;

pub use error::FetchError;
pub use http::{HttpConfigSource, RemoteConfigDocument};
pub use remote::{ConfigSnapshot, FetchInfo, FetchOutcome, LastFetchStatus, RemoteConfig};
pub use settings::{FetchSettings, DEFAULT_CACHE_EXPIRATION};
pub use source::{ConfigSource, ConfigValues, UnconfiguredSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
