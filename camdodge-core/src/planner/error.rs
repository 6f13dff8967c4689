use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::{CameraSourceError, DirectionsError, polyline::PolylineError};

/// Which of the two planned routes an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// The route constrained by exclusion zones.
    Avoiding,
    /// The unconstrained baseline route.
    Direct,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Avoiding => "avoiding",
            Self::Direct => "direct",
        })
    }
}

/// Errors from [`crate::RoutePlanner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The camera dataset could not be loaded.
    #[error(transparent)]
    Cameras(#[from] CameraSourceError),
    /// A directions call failed before the service answered, or its answer
    /// could not be decoded.
    #[error("{route} directions request failed: {source}")]
    Transport {
        /// Route whose call failed.
        route: RouteKind,
        /// Provider error.
        #[source]
        source: DirectionsError,
    },
    /// The directions service rejected at least one call.
    ///
    /// `details` holds one entry per call, avoiding first: the provider's
    /// response body on success or its error payload on failure.
    #[error("directions provider failed for {} route(s)", failures.len())]
    Upstream {
        /// Failed calls and their errors.
        failures: Vec<(RouteKind, DirectionsError)>,
        /// Diagnostic payloads for both calls.
        details: Vec<Value>,
    },
    /// A call succeeded but returned no encoded path.
    #[error("no valid geometry in {route} route")]
    MissingGeometry {
        /// Route lacking a geometry.
        route: RouteKind,
        /// Full response body of that call.
        data: Value,
    },
    /// The encoded path could not be decoded.
    #[error("failed to decode {route} route geometry: {source}")]
    Decode {
        /// Route whose geometry was invalid.
        route: RouteKind,
        /// Decoder error.
        #[source]
        source: PolylineError,
    },
}
