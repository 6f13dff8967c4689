//! The combined payload returned for one routing request.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Camera, RouteStep};

/// Per-route provider metadata, passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteMetadata {
    /// Metadata block of the avoidance route response.
    #[serde(default)]
    pub avoiding: Value,
    /// Metadata block of the direct route response.
    #[serde(default)]
    pub direct: Value,
}

/// Totals and instructions for the avoidance route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Directions {
    /// Route length in metres.
    pub distance: f64,
    /// Route duration in seconds.
    pub duration: f64,
    /// Ordered step instructions.
    pub steps: Vec<RouteStep>,
}

/// Avoidance and direct routes with the cameras they were planned against.
///
/// Paths are longitude-first and serialise as `[lon, lat]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedRouteResponse {
    /// The camera-avoiding path.
    #[serde(with = "lon_lat_path")]
    pub route: Vec<Coord<f64>>,
    /// The unconstrained path.
    #[serde(with = "lon_lat_path")]
    pub direct_route: Vec<Coord<f64>>,
    /// Every camera considered for this request.
    pub cameras: Vec<Camera>,
    /// Bounding box of the avoidance route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// Provider metadata for both calls.
    pub metadata: RouteMetadata,
    /// Totals and instructions of the avoidance route.
    pub directions: Directions,
    /// Ids of cameras within the proximity threshold of the direct route.
    #[serde(default)]
    pub cameras_near_direct_route: Vec<String>,
    /// How many cameras the direct route would have passed.
    #[serde(default)]
    pub avoided_camera_count: usize,
}

mod lon_lat_path {
    use geo::Coord;
    use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};

    pub(super) fn serialize<S: Serializer>(
        path: &[Coord<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(path.len()))?;
        for coord in path {
            seq.serialize_element(&[coord.x, coord.y])?;
        }
        seq.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Coord<f64>>, D::Error> {
        let pairs = Vec::<[f64; 2]>::deserialize(deserializer)?;
        Ok(pairs.into_iter().map(|[x, y]| Coord { x, y }).collect())
    }
}
