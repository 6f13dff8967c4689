//! Public surveillance cameras used as routing hazards.

use geo::Coord;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single camera from the reference dataset.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. On the wire
/// the location is written as `{"lat": .., "lng": ..}` and the category label
/// as `type`, matching what map clients expect.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::Camera;
///
/// let camera = Camera::new("cam-1", Coord { x: -73.975, y: 40.755 }, "traffic");
/// let json = serde_json::to_value(&camera)?;
///
/// assert_eq!(json["location"]["lng"], -73.975);
/// assert_eq!(json["type"], "traffic");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Stable identifier, also used to address the live image feed.
    pub id: String,
    /// Camera position.
    #[serde(with = "lat_lng")]
    pub location: Coord<f64>,
    /// Free-form category label, `"unknown"` when the source omits it.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Camera {
    /// Construct a camera from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, location: Coord<f64>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location,
            kind: kind.into(),
        }
    }
}

/// Serde adapter writing a coordinate as `{"lat", "lng"}`.
mod lat_lng {
    use super::{Coord, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct LatLng {
        lat: f64,
        lng: f64,
    }

    pub(super) fn serialize<S: Serializer>(
        location: &Coord<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        LatLng {
            lat: location.y,
            lng: location.x,
        }
        .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Coord<f64>, D::Error> {
        let LatLng { lat, lng } = LatLng::deserialize(deserializer)?;
        Ok(Coord { x: lng, y: lat })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn serialises_location_as_lat_lng() {
        let camera = Camera::new("42", Coord { x: -73.9, y: 40.7 }, "traffic");
        let value = serde_json::to_value(&camera).expect("camera should serialise");
        assert_eq!(
            value,
            json!({"id": "42", "location": {"lat": 40.7, "lng": -73.9}, "type": "traffic"})
        );
    }

    #[rstest]
    fn deserialises_wire_shape() {
        let camera: Camera = serde_json::from_value(
            json!({"id": "7", "location": {"lat": 1.5, "lng": 2.5}, "type": "speed"}),
        )
        .expect("camera should deserialise");
        assert_eq!(camera.location, Coord { x: 2.5, y: 1.5 });
        assert_eq!(camera.kind, "speed");
    }
}
