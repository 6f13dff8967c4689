//! Origin/destination pairs parsed from `lon,lat` query values.

use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

/// Errors from parsing a [`RouteRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteRequestError {
    /// A required endpoint was not supplied.
    #[error("missing {field} coordinates")]
    Missing {
        /// Query parameter name.
        field: &'static str,
    },
    /// An endpoint was not exactly two finite numbers.
    #[error("{field} must be `lon,lat`, got {value:?}")]
    Malformed {
        /// Query parameter name.
        field: &'static str,
        /// Raw value received.
        value: String,
    },
}

/// Origin and destination of a route, longitude first.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use camdodge_core::RouteRequest;
///
/// let request = RouteRequest::from_query(Some("-73.98,40.75"), Some("-73.97,40.76"))?;
/// assert_eq!(request.origin, Coord { x: -73.98, y: 40.75 });
/// # Ok::<(), camdodge_core::RouteRequestError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Start of the route.
    pub origin: Coord<f64>,
    /// End of the route.
    pub destination: Coord<f64>,
}

impl RouteRequest {
    /// Construct a request from two coordinates.
    #[must_use]
    pub const fn new(origin: Coord<f64>, destination: Coord<f64>) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Parse the `start` and `end` query values.
    ///
    /// # Errors
    ///
    /// Returns [`RouteRequestError::Missing`] when a value is absent and
    /// [`RouteRequestError::Malformed`] when it is not two finite numbers.
    pub fn from_query(start: Option<&str>, end: Option<&str>) -> Result<Self, RouteRequestError> {
        let origin = parse_pair("start", start)?;
        let destination = parse_pair("end", end)?;
        Ok(Self::new(origin, destination))
    }
}

/// Parse a single `lon,lat` value.
///
/// # Errors
///
/// Returns [`RouteRequestError`] as described on [`RouteRequest::from_query`].
pub fn parse_pair(field: &'static str, raw: Option<&str>) -> Result<Coord<f64>, RouteRequestError> {
    let value = raw.ok_or(RouteRequestError::Missing { field })?;
    let malformed = || RouteRequestError::Malformed {
        field,
        value: value.to_owned(),
    };

    let mut parts = value.split(',').map(|part| f64::from_str(part.trim()));
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) if x.is_finite() && y.is_finite() => Ok(Coord { x, y }),
        _ => Err(malformed()),
    }
}
