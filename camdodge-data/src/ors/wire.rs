//! Serde types for the OpenRouteService JSON API.

use camdodge_core::{DirectionsError, DirectionsQuery, DirectionsResponse, RouteStep, RouteSummary};
use geo::{Coord, LineString, MultiPolygon};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /v2/directions/{profile}`.
#[derive(Debug, Serialize)]
pub(crate) struct DirectionsRequestBody {
    coordinates: [[f64; 2]; 2],
    geometry: bool,
    instructions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<RequestOptions>,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    avoid_polygons: GeoJsonMultiPolygon,
}

/// GeoJSON `MultiPolygon` geometry with `[lon, lat]` positions.
#[derive(Debug, Serialize)]
pub(crate) struct GeoJsonMultiPolygon {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

impl From<&MultiPolygon<f64>> for GeoJsonMultiPolygon {
    fn from(zones: &MultiPolygon<f64>) -> Self {
        let coordinates = zones
            .iter()
            .map(|polygon| {
                std::iter::once(polygon.exterior())
                    .chain(polygon.interiors())
                    .map(positions)
                    .collect()
            })
            .collect();
        Self {
            kind: "MultiPolygon",
            coordinates,
        }
    }
}

fn positions(ring: &LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

const fn position(coord: Coord<f64>) -> [f64; 2] {
    [coord.x, coord.y]
}

impl From<&DirectionsQuery> for DirectionsRequestBody {
    fn from(query: &DirectionsQuery) -> Self {
        Self {
            coordinates: [position(query.origin), position(query.destination)],
            geometry: true,
            instructions: query.instructions,
            options: query.avoid.as_ref().map(|zones| RequestOptions {
                avoid_polygons: zones.into(),
            }),
        }
    }
}

/// Successful directions response, first route only.
#[derive(Debug, Deserialize)]
struct DirectionsBody {
    #[serde(default)]
    routes: Vec<RouteBody>,
    #[serde(default)]
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct RouteBody {
    #[serde(default)]
    geometry: Value,
    #[serde(default)]
    summary: RouteSummary,
    #[serde(default)]
    segments: Vec<SegmentBody>,
}

#[derive(Debug, Deserialize)]
struct SegmentBody {
    #[serde(default)]
    steps: Vec<RouteStep>,
}

/// Convert a successful response body into a [`DirectionsResponse`].
///
/// A missing route or a non-string geometry is not an error here; the
/// planner reports those with the payload attached.
pub(crate) fn convert_directions(raw: Value) -> Result<DirectionsResponse, DirectionsError> {
    let body = DirectionsBody::deserialize(&raw).map_err(|err| DirectionsError::Parse {
        message: err.to_string(),
    })?;
    let first = body.routes.into_iter().next();
    let (geometry, summary, steps) = first.map_or_else(
        || (None, RouteSummary::default(), Vec::new()),
        |route| {
            let steps = route
                .segments
                .into_iter()
                .next()
                .map(|segment| segment.steps)
                .unwrap_or_default();
            (route.geometry.as_str().map(str::to_owned), route.summary, steps)
        },
    );
    Ok(DirectionsResponse {
        geometry,
        summary,
        steps,
        bbox: body.bbox,
        metadata: body.metadata,
        raw,
    })
}

/// Geocoding search response.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub(crate) features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub(crate) geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PointGeometry {
    pub(crate) coordinates: [f64; 2],
}
