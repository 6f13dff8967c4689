//! Directions provider trait and its query/response types.

use std::sync::Arc;

use async_trait::async_trait;
use geo::{Coord, MultiPolygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DirectionsError;
use crate::RouteRequest;

/// A single turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Human readable instruction, e.g. "Turn left onto Broadway".
    pub instruction: String,
    /// Step length in metres.
    #[serde(default)]
    pub distance: f64,
    /// Step duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// Whole-route totals.
///
/// Providers omit zero values, so both fields default to `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route length in metres.
    #[serde(default)]
    pub distance: f64,
    /// Route duration in seconds.
    #[serde(default)]
    pub duration: f64,
}

/// Parameters for one directions call.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsQuery {
    /// Start of the route.
    pub origin: Coord<f64>,
    /// End of the route.
    pub destination: Coord<f64>,
    /// Areas the route must not enter.
    pub avoid: Option<MultiPolygon<f64>>,
    /// Whether step instructions should be returned.
    pub instructions: bool,
}

impl DirectionsQuery {
    /// Query for a route that stays out of `zones`, with instructions.
    #[must_use]
    pub fn avoiding(request: &RouteRequest, zones: MultiPolygon<f64>) -> Self {
        Self {
            origin: request.origin,
            destination: request.destination,
            avoid: Some(zones),
            instructions: true,
        }
    }

    /// Unconstrained query returning only the path.
    #[must_use]
    pub const fn direct(request: &RouteRequest) -> Self {
        Self {
            origin: request.origin,
            destination: request.destination,
            avoid: None,
            instructions: false,
        }
    }
}

/// A decoded directions response.
///
/// Only the first route of the response is represented; `raw` keeps the full
/// payload for diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectionsResponse {
    /// Encoded polyline of the first route, if the service returned one.
    pub geometry: Option<String>,
    /// Totals for the first route.
    pub summary: RouteSummary,
    /// Steps of the first route's first segment.
    pub steps: Vec<RouteStep>,
    /// Bounding box as `[min_lon, min_lat, max_lon, max_lat]`.
    pub bbox: Option<Vec<f64>>,
    /// Provider-specific request metadata, passed through untouched.
    pub metadata: Value,
    /// Full response body.
    pub raw: Value,
}

/// Fetch routes from a directions service.
///
/// Implementations must be shareable across tasks; one provider instance
/// serves every request of a running server.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use camdodge_core::{DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse};
///
/// struct Unavailable;
///
/// #[async_trait]
/// impl DirectionsProvider for Unavailable {
///     async fn directions(
///         &self,
///         _query: &DirectionsQuery,
///     ) -> Result<DirectionsResponse, DirectionsError> {
///         Err(DirectionsError::Network {
///             url: "http://localhost".to_owned(),
///             message: "offline".to_owned(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Request a route for `query`.
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError>;
}

#[async_trait]
impl<T: DirectionsProvider + ?Sized> DirectionsProvider for Arc<T> {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        (**self).directions(query).await
    }
}
