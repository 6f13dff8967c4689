//! Encoded polyline codec.
//!
//! Directions providers return geometries in the Google encoded polyline
//! format, which stores `(lat, lon)` deltas. The `polyline` crate converts
//! between that format and longitude-first [`Coord`] values, so the
//! latitude/longitude swap happens in exactly one place.

use geo::{Coord, LineString};
use thiserror::Error;

/// Precision used by OpenRouteService and Google (five decimal places).
pub const DEFAULT_PRECISION: u32 = 5;

/// Errors from [`decode`] and [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// The input is not a valid encoded polyline.
    #[error("invalid encoded polyline: {message}")]
    Decode {
        /// Codec error description.
        message: String,
    },
    /// A coordinate lies outside the WGS84 range.
    #[error("cannot encode path: {message}")]
    Encode {
        /// Codec error description.
        message: String,
    },
}

/// Decode an encoded polyline into longitude-first coordinates.
///
/// # Errors
///
/// Returns [`PolylineError::Decode`] when the input holds characters outside
/// the polyline alphabet, stops mid-coordinate or decodes to an out-of-range
/// position.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::polyline::{decode, DEFAULT_PRECISION};
///
/// let coords = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@", DEFAULT_PRECISION)?;
/// assert_eq!(coords.first(), Some(&Coord { x: -120.2, y: 38.5 }));
/// # Ok::<(), camdodge_core::polyline::PolylineError>(())
/// ```
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coord<f64>>, PolylineError> {
    ::polyline::decode_polyline(encoded, precision)
        .map(LineString::into_inner)
        .map_err(|err| PolylineError::Decode {
            message: err.to_string(),
        })
}

/// Encode longitude-first coordinates as a polyline.
///
/// # Errors
///
/// Returns [`PolylineError::Encode`] when a coordinate is outside the valid
/// longitude or latitude range.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::polyline::{encode, DEFAULT_PRECISION};
///
/// let coords = [
///     Coord { x: -120.2, y: 38.5 },
///     Coord { x: -120.95, y: 40.7 },
///     Coord { x: -126.453, y: 43.252 },
/// ];
/// assert_eq!(encode(&coords, DEFAULT_PRECISION)?, "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
/// # Ok::<(), camdodge_core::polyline::PolylineError>(())
/// ```
pub fn encode(coords: &[Coord<f64>], precision: u32) -> Result<String, PolylineError> {
    ::polyline::encode_coordinates(coords.iter().copied(), precision).map_err(|err| {
        PolylineError::Encode {
            message: err.to_string(),
        }
    })
}
