//! Mapping of planner failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use camdodge_core::{CameraSourceError, PlanError, RouteRequestError};
use log::{error, warn};
use serde_json::{Value, json};

pub(crate) const INVALID_COORDINATES: &str = "Invalid coordinates provided";
pub(crate) const UPSTREAM_FAILED: &str = "Failed to fetch routes from ORS";
pub(crate) const REQUEST_FAILED: &str = "Could not complete route request";
pub(crate) const CAMERAS_FAILED: &str = "Could not load cameras";

/// Failures of the HTTP handlers.
///
/// Every variant renders as a JSON object with an `error` message. Upstream
/// failures add `details` with one payload per directions call, avoiding
/// first; missing geometries add the offending response as `data`.
#[derive(Debug)]
pub(crate) enum ApiError {
    InvalidCoordinates(RouteRequestError),
    Plan(PlanError),
    Cameras(CameraSourceError),
}

impl From<RouteRequestError> for ApiError {
    fn from(err: RouteRequestError) -> Self {
        Self::InvalidCoordinates(err)
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self::Plan(err)
    }
}

impl ApiError {
    fn status_and_body(self) -> (StatusCode, Value) {
        match self {
            Self::InvalidCoordinates(err) => {
                warn!("rejecting route request: {err}");
                (StatusCode::BAD_REQUEST, json!({ "error": INVALID_COORDINATES }))
            }
            Self::Plan(PlanError::Upstream { details, .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": UPSTREAM_FAILED, "details": details }),
            ),
            Self::Plan(PlanError::MissingGeometry { route, data }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": format!("No valid geometry in {route} route"), "data": data }),
            ),
            Self::Plan(err) => {
                error!("route request failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": REQUEST_FAILED }),
                )
            }
            Self::Cameras(err) => {
                error!("camera listing failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": CAMERAS_FAILED }),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
