//! Camera reference data read from a JSON file.
//!
//! Published camera datasets disagree on shape, so each record is normalised:
//!
//! - `location: {"lat", "lng"}` with numeric members is used as is;
//! - `location: [lng, lat]` is read longitude first;
//! - otherwise flat `latitude`/`lat` and `longitude`/`lng` fields are used,
//!   defaulting to `0`;
//! - a missing `id` becomes `camera-<index>`; numeric ids are stringified;
//! - a missing `type` becomes `"unknown"`.
//!
//! Records that are not JSON objects are skipped with a warning.

use camdodge_core::{Camera, CameraSource, CameraSourceError};
use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use log::{debug, warn};
use serde_json::{Map, Value};

/// Category assigned to cameras without a `type`.
pub const UNKNOWN_KIND: &str = "unknown";

/// Camera source re-reading a JSON array from disk on every load.
///
/// Edits to the file are visible on the next request without a restart.
#[derive(Debug, Clone)]
pub struct JsonFileCameraSource {
    path: Utf8PathBuf,
}

impl JsonFileCameraSource {
    /// Create a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CameraSource for JsonFileCameraSource {
    fn load_cameras(&self) -> Result<Vec<Camera>, CameraSourceError> {
        let text = camdodge_fs::read_to_string(&self.path).map_err(|err| CameraSourceError::Io {
            location: self.path.to_string(),
            message: err.to_string(),
        })?;
        let cameras = parse_cameras(&text, self.path.as_str())?;
        debug!("loaded {} cameras from {}", cameras.len(), self.path);
        Ok(cameras)
    }
}

/// Parse and normalise a JSON array of camera records.
///
/// `location` names the data's origin in error messages.
///
/// # Errors
///
/// Returns [`CameraSourceError::Parse`] when `text` is not JSON or not an
/// array.
///
/// # Examples
/// ```
/// use camdodge_data::cameras::parse_cameras;
///
/// let cameras = parse_cameras(r#"[{"id": 7, "location": [-73.97, 40.75]}]"#, "inline")?;
/// assert_eq!(cameras[0].id, "7");
/// assert_eq!(cameras[0].location.x, -73.97);
/// assert_eq!(cameras[0].kind, "unknown");
/// # Ok::<(), camdodge_core::CameraSourceError>(())
/// ```
pub fn parse_cameras(text: &str, location: &str) -> Result<Vec<Camera>, CameraSourceError> {
    let parse_error = |message: String| CameraSourceError::Parse {
        location: location.to_owned(),
        message,
    };
    let value: Value = serde_json::from_str(text).map_err(|err| parse_error(err.to_string()))?;
    let Value::Array(records) = value else {
        return Err(parse_error("expected a JSON array of cameras".to_owned()));
    };
    Ok(records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let normalised = record.as_object().map(|fields| normalise(index, fields));
            if normalised.is_none() {
                warn!("skipping camera record {index} in {location}: not an object");
            }
            normalised
        })
        .collect())
}

fn normalise(index: usize, fields: &Map<String, Value>) -> Camera {
    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("camera-{index}"),
    };
    let kind = match fields.get("type") {
        Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
        _ => UNKNOWN_KIND.to_owned(),
    };
    Camera::new(id, location_of(fields), kind)
}

fn location_of(fields: &Map<String, Value>) -> Coord<f64> {
    match fields.get("location") {
        Some(Value::Object(location)) => {
            let lat = location.get("lat").and_then(Value::as_f64);
            let lng = location.get("lng").and_then(Value::as_f64);
            if let (Some(y), Some(x)) = (lat, lng) {
                return Coord { x, y };
            }
        }
        Some(Value::Array(pair)) => {
            let mut parts = pair.iter().map(|part| part.as_f64().unwrap_or_default());
            let x = parts.next().unwrap_or_default();
            let y = parts.next().unwrap_or_default();
            return Coord { x, y };
        }
        _ => {}
    }
    Coord {
        x: first_number(fields, &["longitude", "lng"]),
        y: first_number(fields, &["latitude", "lat"]),
    }
}

/// First non-zero numeric field among `keys`, or `0`.
fn first_number(fields: &Map<String, Value>, keys: &[&str]) -> f64 {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_f64))
        .find(|value| *value != 0.0)
        .unwrap_or_default()
}
