//! Core domain types and logic for the camdodge route planner.
//!
//! The crate is runtime agnostic: it defines the camera model, the exclusion
//! zone builder, the route/camera proximity filter, the polyline codec and
//! the [`RoutePlanner`] that fans out to a [`DirectionsProvider`]. Concrete
//! HTTP clients live in `camdodge-data`.
//!
//! Coordinates are WGS84 [`geo::Coord`] values with `x = longitude` and
//! `y = latitude` throughout.

#![forbid(unsafe_code)]

mod camera;
mod camera_source;
pub mod directions;
pub mod exclusion;
mod geocode;
pub mod planner;
pub mod polyline;
pub mod proximity;
mod request;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use camera::Camera;
pub use camera_source::{CameraSource, CameraSourceError};
pub use directions::{
    DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse, RouteStep,
    RouteSummary,
};
pub use geocode::{GeocodeError, Geocoder};
pub use planner::{CombinedRouteResponse, PlanError, RouteKind, RoutePlanner};
pub use request::{RouteRequest, RouteRequestError, parse_pair};
