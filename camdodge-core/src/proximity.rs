//! Decide which cameras sit on a route.
//!
//! Distances are measured on a flat projection in degrees and converted with a
//! fixed 111 km per degree. This is only meaningful at city scale and ignores
//! longitude compression, so east-west distances are overstated away from
//! the equator. The conversion is kept as is so camera counts match what map
//! clients already display.

use geo::Coord;

use crate::Camera;

/// Kilometres per degree used by the flat distance approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Default "on the route" threshold: 100 metres, in kilometres.
pub const DEFAULT_PROXIMITY_KM: f64 = 0.1;

/// Distance from `point` to the segment `start`..`end`, in approximate km.
///
/// The point is projected onto the infinite line through the segment and the
/// projection parameter is clamped to `[0, 1]`, so points beyond either end
/// measure to the nearer endpoint. A zero-length segment measures to `start`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::proximity::point_to_segment_distance_km;
///
/// let d = point_to_segment_distance_km(
///     Coord { x: 0.5, y: 1.0 },
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
/// );
/// assert!((d - 111.0).abs() < 1e-9);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "closed-form point projection needs dot products"
)]
pub fn point_to_segment_distance_km(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    let delta = end - start;
    let offset = point - start;
    let length_sq = delta.x * delta.x + delta.y * delta.y;

    let nearest = if length_sq == 0.0 {
        start
    } else {
        let t = ((offset.x * delta.x + offset.y * delta.y) / length_sq).clamp(0.0, 1.0);
        start + delta * t
    };

    let gap = point - nearest;
    gap.x.hypot(gap.y) * KM_PER_DEGREE
}

/// Whether `point` lies within `max_km` of any segment of `route`.
///
/// Routes with fewer than two points have no segments and never match.
#[must_use]
pub fn is_near_route(point: Coord<f64>, route: &[Coord<f64>], max_km: f64) -> bool {
    route
        .iter()
        .zip(route.iter().skip(1))
        .any(|(&start, &end)| point_to_segment_distance_km(point, start, end) <= max_km)
}

/// Cameras within `max_km` of `route`, in input order.
pub fn cameras_near_route<'a>(
    cameras: &'a [Camera],
    route: &'a [Coord<f64>],
    max_km: f64,
) -> impl Iterator<Item = &'a Camera> + 'a {
    cameras
        .iter()
        .filter(move |camera| is_near_route(camera.location, route, max_km))
}

/// Number of cameras within `max_km` of `route`.
#[must_use]
pub fn count_cameras_near_route(cameras: &[Camera], route: &[Coord<f64>], max_km: f64) -> usize {
    cameras_near_route(cameras, route, max_km).count()
}
