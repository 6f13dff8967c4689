//! Circular exclusion zones around cameras.
//!
//! Each camera becomes a small polygon that the directions provider is asked
//! to route around. The circle is approximated on a local planar projection:
//! the radius is converted to degrees separately for latitude and longitude,
//! the latter scaled by `cos(latitude)` so the zone keeps its shape away from
//! the equator. At the 80 m radius used here the curvature error is
//! negligible.

use std::f64::consts::TAU;

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::Camera;

/// Radius of a camera's exclusion zone, in metres.
pub const DEFAULT_EXCLUSION_RADIUS_M: f64 = 80.0;

/// Number of boundary points sampled per zone (a dodecagon).
pub const DEFAULT_SEGMENTS: usize = 12;

/// Approximate metres spanned by one degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Fewest boundary points that still form a valid ring.
const MIN_SEGMENTS: usize = 3;

/// Largest latitude magnitude used for the longitude scale. Closer to the
/// poles `cos(latitude)` tends to zero and the longitude radius diverges.
const MAX_SCALE_LATITUDE: f64 = 89.0;

/// Sample a closed ring approximating a circle around `center`.
///
/// The ring holds `segments + 1` points: `segments` evenly spaced samples over
/// `[0, 2π)` followed by the first sample again. Fewer than three segments are
/// raised to three so the ring always encloses an area. Centres beyond
/// ±89° latitude are scaled as if they sat at ±89°, keeping every sample
/// finite.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::exclusion::circle_ring;
///
/// let ring = circle_ring(Coord { x: -73.975, y: 40.755 }, 80.0, 12);
/// assert_eq!(ring.0.len(), 13);
/// assert_eq!(ring.0.first(), ring.0.last());
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "circle sampling is trigonometry over degree offsets"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "segment counts are tiny and convert exactly to f64"
)]
pub fn circle_ring(center: Coord<f64>, radius_m: f64, segments: usize) -> LineString<f64> {
    let sample_count = segments.max(MIN_SEGMENTS);
    let scale_latitude = center.y.clamp(-MAX_SCALE_LATITUDE, MAX_SCALE_LATITUDE);
    let meters_per_degree_lng = METERS_PER_DEGREE_LAT * scale_latitude.to_radians().cos();
    let radius_lat = radius_m / METERS_PER_DEGREE_LAT;
    let radius_lng = radius_m / meters_per_degree_lng;

    let mut coords: Vec<Coord<f64>> = (0..sample_count)
        .map(|i| {
            let angle = TAU * i as f64 / sample_count as f64;
            Coord {
                x: center.x + radius_lng * angle.cos(),
                y: center.y + radius_lat * angle.sin(),
            }
        })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// Build a single-ring polygon around `center`.
#[must_use]
pub fn exclusion_polygon(center: Coord<f64>, radius_m: f64, segments: usize) -> Polygon<f64> {
    Polygon::new(circle_ring(center, radius_m, segments), Vec::new())
}

/// Radius and sampling settings for building exclusion zones.
///
/// These are internal tuning constants, not user input; the defaults trade a
/// little accuracy for compact directions payloads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZoneBuilder {
    /// Zone radius in metres.
    pub radius_m: f64,
    /// Boundary points per zone.
    pub segments: usize,
}

impl Default for ExclusionZoneBuilder {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_EXCLUSION_RADIUS_M,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl ExclusionZoneBuilder {
    /// Build the zone for one camera.
    #[must_use]
    pub fn polygon_for(&self, camera: &Camera) -> Polygon<f64> {
        exclusion_polygon(camera.location, self.radius_m, self.segments)
    }

    /// Build one polygon per camera, collected as a multi-polygon.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use camdodge_core::{Camera, exclusion::ExclusionZoneBuilder};
    ///
    /// let cameras = vec![
    ///     Camera::new("a", Coord { x: 0.0, y: 0.0 }, "traffic"),
    ///     Camera::new("b", Coord { x: 1.0, y: 1.0 }, "traffic"),
    /// ];
    /// let zones = ExclusionZoneBuilder::default().zones_for(&cameras);
    /// assert_eq!(zones.0.len(), 2);
    /// ```
    #[must_use]
    pub fn zones_for(&self, cameras: &[Camera]) -> MultiPolygon<f64> {
        MultiPolygon::new(cameras.iter().map(|camera| self.polygon_for(camera)).collect())
    }
}

/// Build default-sized exclusion zones for every camera.
#[must_use]
pub fn exclusion_zones(cameras: &[Camera]) -> MultiPolygon<f64> {
    ExclusionZoneBuilder::default().zones_for(cameras)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Contains, Point};
    use rstest::rstest;

    #[expect(clippy::float_arithmetic, reason = "tests measure offsets in degrees")]
    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1.0e-9
    }

    #[rstest]
    #[case(3)]
    #[case(12)]
    #[case(64)]
    fn ring_is_closed_with_segments_plus_one_points(#[case] segments: usize) {
        let ring = circle_ring(Coord { x: 10.0, y: 50.0 }, 80.0, segments);
        assert_eq!(ring.0.len(), segments + 1);
        assert_eq!(ring.0.first(), ring.0.last());
        assert!(ring.is_closed());
    }

    #[rstest]
    #[case::north_pole(90.0)]
    #[case::south_pole(-90.0)]
    #[case::near_pole(89.999_999)]
    fn polar_centres_yield_finite_rings(#[case] latitude: f64) {
        let ring = circle_ring(Coord { x: 0.0, y: latitude }, 80.0, 12);
        assert!(ring.0.iter().all(|coord| coord.x.is_finite() && coord.y.is_finite()));
        let widest = circle_ring(
            Coord {
                x: 0.0,
                y: MAX_SCALE_LATITUDE.copysign(latitude),
            },
            80.0,
            12,
        );
        let east = ring.0.first().map(|coord| coord.x);
        assert_eq!(east, widest.0.first().map(|coord| coord.x));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    fn degenerate_segment_counts_are_raised(#[case] segments: usize) {
        let ring = circle_ring(Coord { x: 0.0, y: 0.0 }, 80.0, segments);
        assert_eq!(ring.0.len(), MIN_SEGMENTS + 1);
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "expected radii are derived in degrees")]
    fn first_point_lies_east_and_quarter_turn_lies_north() {
        let center = Coord { x: -73.975, y: 40.755 };
        let ring = circle_ring(center, 80.0, 12);
        let east = ring.0.first().copied().expect("ring has points");
        let north = ring.0.get(3).copied().expect("ring has 13 points");

        let expected_lng = 80.0 / (METERS_PER_DEGREE_LAT * center.y.to_radians().cos());
        let expected_lat = 80.0 / METERS_PER_DEGREE_LAT;

        assert!(close(east.x - center.x, expected_lng));
        assert!(close(east.y, center.y));
        assert!(close(north.y - center.y, expected_lat));
        assert!(close(north.x, center.x));
    }

    #[rstest]
    fn longitude_radius_widens_away_from_equator() {
        let equator = circle_ring(Coord { x: 0.0, y: 0.0 }, 80.0, 12);
        let north = circle_ring(Coord { x: 0.0, y: 60.0 }, 80.0, 12);
        let equator_east = equator.0.first().map(|c| c.x).expect("ring has points");
        let north_east = north.0.first().map(|c| c.x).expect("ring has points");
        assert!(north_east > equator_east);
    }

    #[rstest]
    fn polygon_contains_its_camera() {
        let camera = Camera::new("c", Coord { x: 2.35, y: 48.85 }, "traffic");
        let polygon = ExclusionZoneBuilder::default().polygon_for(&camera);
        assert!(polygon.contains(&Point::from(camera.location)));
        assert!(polygon.interiors().is_empty());
    }

    #[rstest]
    fn zones_cover_every_camera_in_order() {
        let cameras = vec![
            Camera::new("a", Coord { x: 0.0, y: 0.0 }, "t"),
            Camera::new("b", Coord { x: 5.0, y: 5.0 }, "t"),
        ];
        let zones = exclusion_zones(&cameras);
        assert_eq!(zones.0.len(), 2);
        let second = zones.0.get(1).expect("two zones");
        assert!(second.contains(&Point::new(5.0, 5.0)));
    }

    #[rstest]
    fn no_cameras_yield_empty_multipolygon() {
        assert!(exclusion_zones(&[]).0.is_empty());
    }
}
