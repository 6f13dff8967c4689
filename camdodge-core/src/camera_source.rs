//! Read-only access to the camera reference dataset.

use std::sync::Arc;

use thiserror::Error;

use crate::Camera;

/// Errors from [`CameraSource::load_cameras`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraSourceError {
    /// The dataset could not be read.
    #[error("failed to read camera data from {location}: {message}")]
    Io {
        /// Where the data was expected.
        location: String,
        /// Underlying error description.
        message: String,
    },
    /// The dataset was read but could not be decoded.
    #[error("failed to parse camera data from {location}: {message}")]
    Parse {
        /// Where the data came from.
        location: String,
        /// Decoder error description.
        message: String,
    },
}

/// Supplies the camera set for a routing request.
///
/// Sources are consulted once per request and must not cache on behalf of
/// the caller; a source backed by a file reflects edits on the next request.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use camdodge_core::{Camera, CameraSource, CameraSourceError};
///
/// struct OneCamera;
///
/// impl CameraSource for OneCamera {
///     fn load_cameras(&self) -> Result<Vec<Camera>, CameraSourceError> {
///         Ok(vec![Camera::new("1", Coord { x: 0.0, y: 0.0 }, "traffic")])
///     }
/// }
///
/// assert_eq!(OneCamera.load_cameras()?.len(), 1);
/// # Ok::<(), CameraSourceError>(())
/// ```
pub trait CameraSource: Send + Sync {
    /// Load every camera in the dataset.
    fn load_cameras(&self) -> Result<Vec<Camera>, CameraSourceError>;
}

impl<T: CameraSource + ?Sized> CameraSource for Arc<T> {
    fn load_cameras(&self) -> Result<Vec<Camera>, CameraSourceError> {
        (**self).load_cameras()
    }
}
