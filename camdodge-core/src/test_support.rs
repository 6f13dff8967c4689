//! Test-only, in-memory collaborators used by unit and behaviour tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use geo::{BoundingRect, Coord, LineString};
use serde_json::json;

use crate::polyline::{DEFAULT_PRECISION, encode};
use crate::{
    Camera, CameraSource, CameraSourceError, DirectionsError, DirectionsProvider,
    DirectionsQuery, DirectionsResponse, RouteStep, RouteSummary,
};

/// Camera source serving a fixed list, counting how often it is read.
#[derive(Debug)]
pub struct StaticCameraSource {
    outcome: Result<Vec<Camera>, CameraSourceError>,
    loads: AtomicUsize,
}

impl StaticCameraSource {
    /// Serve `cameras` on every load.
    #[must_use]
    pub const fn new(cameras: Vec<Camera>) -> Self {
        Self {
            outcome: Ok(cameras),
            loads: AtomicUsize::new(0),
        }
    }

    /// Fail every load with `error`.
    #[must_use]
    pub const fn failing(error: CameraSourceError) -> Self {
        Self {
            outcome: Err(error),
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of times the cameras were loaded.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl CameraSource for StaticCameraSource {
    fn load_cameras(&self) -> Result<Vec<Camera>, CameraSourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Directions provider returning canned outcomes.
///
/// Queries carrying exclusion zones receive the `avoiding` outcome, all
/// others the `direct` one. Every query is recorded.
#[derive(Debug)]
pub struct StubDirectionsProvider {
    avoiding: Result<DirectionsResponse, DirectionsError>,
    direct: Result<DirectionsResponse, DirectionsError>,
    queries: Mutex<Vec<DirectionsQuery>>,
}

impl StubDirectionsProvider {
    /// Create a stub from the two outcomes.
    #[must_use]
    pub const fn new(
        avoiding: Result<DirectionsResponse, DirectionsError>,
        direct: Result<DirectionsResponse, DirectionsError>,
    ) -> Self {
        Self {
            avoiding,
            direct,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub answering with the given paths.
    ///
    /// The avoidance response carries a single "Head north" step so callers
    /// can tell which response ended up where.
    #[must_use]
    pub fn with_paths(avoiding: &[Coord<f64>], direct: &[Coord<f64>]) -> Self {
        let step = RouteStep {
            instruction: "Head north".to_owned(),
            distance: 250.0,
            duration: 180.0,
        };
        Self::new(
            Ok(route_response(
                avoiding,
                RouteSummary {
                    distance: 1_800.0,
                    duration: 1_300.0,
                },
                vec![step],
            )),
            Ok(route_response(
                direct,
                RouteSummary {
                    distance: 1_400.0,
                    duration: 1_000.0,
                },
                Vec::new(),
            )),
        )
    }

    /// Number of directions calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.recorded().len()
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn recorded(&self) -> Vec<DirectionsQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DirectionsProvider for StubDirectionsProvider {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.clone());
        if query.avoid.is_some() {
            self.avoiding.clone()
        } else {
            self.direct.clone()
        }
    }
}

/// Build a response shaped like an OpenRouteService directions answer.
#[must_use]
pub fn route_response(
    path: &[Coord<f64>],
    summary: RouteSummary,
    steps: Vec<RouteStep>,
) -> DirectionsResponse {
    let geometry = encode(path, DEFAULT_PRECISION).ok();
    let bbox = LineString::new(path.to_vec())
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);
    let metadata = json!({"engine": {"version": "stub"}, "service": "routing"});
    let raw = json!({
        "routes": [{
            "geometry": geometry,
            "summary": summary,
            "segments": [{"steps": steps}],
        }],
        "bbox": bbox,
        "metadata": metadata,
    });
    DirectionsResponse {
        geometry,
        summary,
        steps,
        bbox,
        metadata,
        raw,
    }
}

/// An HTTP 500 failure carrying a provider-style error payload.
#[must_use]
pub fn server_error(message: &str) -> DirectionsError {
    DirectionsError::Http {
        url: "http://directions.test/v2/directions/foot-walking".to_owned(),
        status: 500,
        body: json!({"error": {"code": 2099, "message": message}}),
    }
}
