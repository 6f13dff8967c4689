//! Resolve free-text addresses to coordinates.

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

/// Errors from [`Geocoder::geocode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The service found no match for the query.
    #[error("no location found for {query:?}")]
    NotFound {
        /// Text that was searched for.
        query: String,
    },
    /// The request could not reach the service.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL without credentials.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("{url} returned HTTP {status}: {message}")]
    Http {
        /// Request URL without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

/// Look up the coordinates of an address or place name.
///
/// Failures are final; callers decide whether to ask the user again.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return the best match for `text` as a longitude-first coordinate.
    async fn geocode(&self, text: &str) -> Result<Coord<f64>, GeocodeError>;
}
