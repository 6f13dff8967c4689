//! Fetch paths between two points from an external directions service.
//!
//! The [`DirectionsProvider`] trait abstracts a turn-by-turn routing API. A
//! query carries the endpoints, an optional set of polygons to avoid and a
//! flag asking for step instructions. Responses keep the provider's raw JSON
//! next to the typed fields so error reports can echo what the service sent.

mod error;
mod provider;

pub use error::DirectionsError;
pub use provider::{
    DirectionsProvider, DirectionsQuery, DirectionsResponse, RouteStep, RouteSummary,
};
