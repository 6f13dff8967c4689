//! Test doubles and OpenRouteService payload builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use camdodge_core::polyline::{DEFAULT_PRECISION, encode};
use camdodge_core::{GeocodeError, Geocoder, RouteSummary};
use geo::{BoundingRect, Coord, LineString};
use serde_json::{Value, json};

use crate::feed::{SnapshotError, SnapshotFetcher};

/// A directions response body shaped like the OpenRouteService v2 API.
///
/// `steps` are `(instruction, distance, duration)` triples placed in the
/// first segment of the only route.
#[must_use]
pub fn ors_directions_body(
    path: &[Coord<f64>],
    summary: RouteSummary,
    steps: &[(&str, f64, f64)],
) -> Value {
    let bbox = LineString::new(path.to_vec())
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);
    let step_values: Vec<Value> = steps
        .iter()
        .map(|(instruction, distance, duration)| {
            json!({"instruction": instruction, "distance": distance, "duration": duration, "type": 11})
        })
        .collect();
    json!({
        "bbox": bbox,
        "routes": [{
            "summary": summary,
            "segments": [{"distance": summary.distance, "duration": summary.duration, "steps": step_values}],
            "bbox": bbox,
            "geometry": encode(path, DEFAULT_PRECISION).unwrap_or_default(),
            "way_points": [0, path.len().saturating_sub(1)],
        }],
        "metadata": {
            "attribution": "openrouteservice.org | OpenStreetMap contributors",
            "service": "routing",
            "engine": {"version": "9.0.0"},
        },
    })
}

/// An OpenRouteService error body.
#[must_use]
pub fn ors_error_body(code: u32, message: &str) -> Value {
    json!({
        "error": {"code": code, "message": message},
        "info": {"engine": {"version": "9.0.0"}},
    })
}

/// Snapshot fetcher replaying canned outcomes in order.
///
/// Once the outcomes run out the last one repeats.
#[derive(Debug)]
pub struct StubSnapshotFetcher {
    outcomes: Vec<Result<Vec<u8>, SnapshotError>>,
    calls: AtomicUsize,
}

impl StubSnapshotFetcher {
    /// Create a fetcher from its outcomes.
    #[must_use]
    pub const fn new(outcomes: Vec<Result<Vec<u8>, SnapshotError>>) -> Self {
        Self {
            outcomes,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotFetcher for StubSnapshotFetcher {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<u8>, SnapshotError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.outcomes.len().saturating_sub(1));
        self.outcomes
            .get(index)
            .cloned()
            .unwrap_or_else(|| {
                Err(SnapshotError::Network {
                    url: format!("stub://{camera_id}"),
                    message: "no outcome configured".to_owned(),
                })
            })
    }
}

/// Geocoder resolving from a fixed address book.
#[derive(Debug, Default)]
pub struct StubGeocoder {
    places: HashMap<String, Coord<f64>>,
}

impl StubGeocoder {
    /// Register `text` as resolving to `location`.
    #[must_use]
    pub fn with_place(mut self, text: impl Into<String>, location: Coord<f64>) -> Self {
        self.places.insert(text.into(), location);
        self
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, text: &str) -> Result<Coord<f64>, GeocodeError> {
        self.places
            .get(text)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound {
                query: text.to_owned(),
            })
    }
}
