//! Facade crate for the camdodge route planner.
//!
//! This crate re-exports the core domain types and, behind the `ors`
//! feature, the OpenRouteService clients, the camera dataset loader and the
//! live feed poller.

#![forbid(unsafe_code)]

pub use camdodge_core::{
    Camera, CameraSource, CameraSourceError, CombinedRouteResponse, DirectionsError,
    DirectionsProvider, DirectionsQuery, DirectionsResponse, GeocodeError, Geocoder, PlanError,
    RouteKind, RoutePlanner, RouteRequest, RouteRequestError, RouteStep, RouteSummary, exclusion,
    polyline, proximity,
};

#[cfg(feature = "ors")]
pub use camdodge_data::cameras::JsonFileCameraSource;
#[cfg(feature = "ors")]
pub use camdodge_data::feed::{HttpSnapshotFetcher, PollerConfig, SnapshotPoller};
#[cfg(feature = "ors")]
pub use camdodge_data::ors::{OrsConfig, OrsDirectionsProvider, OrsGeocoder};
