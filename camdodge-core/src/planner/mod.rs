//! Plan a camera-avoiding route alongside the direct one.
//!
//! [`RoutePlanner::plan`] loads the camera set, turns every camera into an
//! exclusion zone and asks the directions provider for two routes at once:
//! one avoiding the zones (with instructions) and one unconstrained (path
//! only). Both calls must succeed; nothing is retried. The direct route is
//! then used to pick the cameras a traveller would have passed.

mod error;
mod response;

use futures_util::future::join;
use geo::Coord;
use log::{debug, error};

use crate::exclusion::ExclusionZoneBuilder;
use crate::polyline::{self, DEFAULT_PRECISION};
use crate::proximity::{DEFAULT_PROXIMITY_KM, cameras_near_route};
use crate::{
    CameraSource, DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse,
    RouteRequest,
};

pub use error::{PlanError, RouteKind};
pub use response::{CombinedRouteResponse, Directions, RouteMetadata};

/// Orchestrates the avoidance and direct directions calls.
///
/// The planner holds no per-request state and can be shared behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use geo::Coord;
/// use camdodge_core::{CameraSource, DirectionsProvider, RoutePlanner, RouteRequest};
///
/// async fn run<P: DirectionsProvider, C: CameraSource>(provider: P, cameras: C) {
///     let planner = RoutePlanner::new(provider, cameras);
///     let request = RouteRequest::new(Coord { x: -73.98, y: 40.75 }, Coord { x: -73.97, y: 40.76 });
///     match planner.plan(&request).await {
///         Ok(response) => assert!(!response.route.is_empty()),
///         Err(err) => log::warn!("{err}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RoutePlanner<P, C> {
    provider: P,
    cameras: C,
    zones: ExclusionZoneBuilder,
    proximity_km: f64,
}

impl<P, C> RoutePlanner<P, C>
where
    P: DirectionsProvider,
    C: CameraSource,
{
    /// Create a planner with the default zone size and proximity threshold.
    #[must_use]
    pub fn new(provider: P, cameras: C) -> Self {
        Self {
            provider,
            cameras,
            zones: ExclusionZoneBuilder::default(),
            proximity_km: DEFAULT_PROXIMITY_KM,
        }
    }

    /// Override the exclusion zone settings.
    #[must_use]
    pub const fn with_zones(mut self, zones: ExclusionZoneBuilder) -> Self {
        self.zones = zones;
        self
    }

    /// Override the "near the route" threshold, in kilometres.
    #[must_use]
    pub const fn with_proximity_km(mut self, proximity_km: f64) -> Self {
        self.proximity_km = proximity_km;
        self
    }

    /// The directions provider backing this planner.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The camera source backing this planner.
    #[must_use]
    pub const fn camera_source(&self) -> &C {
        &self.cameras
    }

    /// Plan both routes for `request`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::Cameras`] when the camera set cannot be loaded.
    /// - [`PlanError::Transport`] when a directions call fails without an
    ///   HTTP answer (network failure, timeout, undecodable body).
    /// - [`PlanError::Upstream`] when the service rejects either call; the
    ///   error carries diagnostics for both calls.
    /// - [`PlanError::MissingGeometry`] when a response has no encoded path.
    /// - [`PlanError::Decode`] when an encoded path is corrupt.
    pub async fn plan(&self, request: &RouteRequest) -> Result<CombinedRouteResponse, PlanError> {
        let cameras = self.cameras.load_cameras()?;
        let zones = self.zones.zones_for(&cameras);
        debug!(
            "planning {:?} -> {:?} around {} exclusion zones",
            request.origin,
            request.destination,
            zones.0.len()
        );

        let avoiding_query = DirectionsQuery::avoiding(request, zones);
        let direct_query = DirectionsQuery::direct(request);
        let (avoiding_result, direct_result) = join(
            self.provider.directions(&avoiding_query),
            self.provider.directions(&direct_query),
        )
        .await;

        let (avoiding, direct) = match (avoiding_result, direct_result) {
            (Ok(avoiding), Ok(direct)) => (avoiding, direct),
            (avoiding_outcome, direct_outcome) => {
                return Err(failed_call(avoiding_outcome, direct_outcome));
            }
        };

        let route = decode_path(RouteKind::Avoiding, &avoiding)?;
        let direct_route = decode_path(RouteKind::Direct, &direct)?;

        let cameras_near_direct_route: Vec<String> =
            cameras_near_route(&cameras, &direct_route, self.proximity_km)
                .map(|camera| camera.id.clone())
                .collect();
        debug!(
            "direct route passes {} of {} cameras",
            cameras_near_direct_route.len(),
            cameras.len()
        );

        Ok(CombinedRouteResponse {
            route,
            direct_route,
            cameras,
            bbox: avoiding.bbox,
            metadata: RouteMetadata {
                avoiding: avoiding.metadata,
                direct: direct.metadata,
            },
            directions: Directions {
                distance: avoiding.summary.distance,
                duration: avoiding.summary.duration,
                steps: avoiding.steps,
            },
            avoided_camera_count: cameras_near_direct_route.len(),
            cameras_near_direct_route,
        })
    }
}

/// Classify a failed fan-out.
///
/// A call that never produced an HTTP answer makes the whole plan a
/// [`PlanError::Transport`]; otherwise the provider's error payloads are
/// reported through [`PlanError::Upstream`].
fn failed_call(
    avoiding: Result<DirectionsResponse, DirectionsError>,
    direct: Result<DirectionsResponse, DirectionsError>,
) -> PlanError {
    let transport = [(RouteKind::Avoiding, &avoiding), (RouteKind::Direct, &direct)]
        .into_iter()
        .find_map(|(kind, outcome)| match outcome {
            Err(err) if !matches!(err, DirectionsError::Http { .. }) => Some((kind, err.clone())),
            _ => None,
        });
    if let Some((route, source)) = transport {
        error!("{route} directions request failed: {source}");
        return PlanError::Transport { route, source };
    }
    upstream_failure(avoiding, direct)
}

fn upstream_failure(
    avoiding: Result<DirectionsResponse, DirectionsError>,
    direct: Result<DirectionsResponse, DirectionsError>,
) -> PlanError {
    let mut failures = Vec::new();
    let mut details = Vec::new();
    for (kind, outcome) in [(RouteKind::Avoiding, avoiding), (RouteKind::Direct, direct)] {
        match outcome {
            Ok(response) => details.push(response.raw),
            Err(err) => {
                error!("{kind} directions request failed: {err}");
                details.push(err.details());
                failures.push((kind, err));
            }
        }
    }
    PlanError::Upstream { failures, details }
}

fn decode_path(
    kind: RouteKind,
    response: &DirectionsResponse,
) -> Result<Vec<Coord<f64>>, PlanError> {
    let Some(encoded) = response.geometry.as_deref().filter(|g| !g.is_empty()) else {
        error!("{kind} directions response has no geometry");
        return Err(PlanError::MissingGeometry {
            route: kind,
            data: response.raw.clone(),
        });
    };
    polyline::decode(encoded, DEFAULT_PRECISION)
        .map_err(|source| PlanError::Decode { route: kind, source })
}
