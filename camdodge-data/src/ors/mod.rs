//! OpenRouteService clients.
//!
//! [`OrsDirectionsProvider`] implements [`camdodge_core::DirectionsProvider`]
//! against `POST /v2/directions/{profile}` and [`OrsGeocoder`] implements
//! [`camdodge_core::Geocoder`] against `GET /geocode/search`. Both are built
//! from an [`OrsConfig`], so no API key is read from global state.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use camdodge_data::ors::{OrsConfig, OrsDirectionsProvider};
//!
//! let config = OrsConfig::new("my-api-key")
//!     .with_profile("driving-car")
//!     .with_timeout(Duration::from_secs(10));
//! let provider = OrsDirectionsProvider::with_config(config)?;
//! # Ok::<(), camdodge_data::ors::ProviderBuildError>(())
//! ```

mod config;
mod directions;
mod geocode;
mod wire;

pub use config::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, OrsConfig,
    ProviderBuildError,
};
pub use directions::OrsDirectionsProvider;
pub use geocode::OrsGeocoder;
