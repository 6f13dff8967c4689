//! `serve` command: the route planning HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use camdodge_core::{
    Camera, CameraSource, CombinedRouteResponse, DirectionsProvider, RoutePlanner, RouteRequest,
};
use camdodge_data::cameras::JsonFileCameraSource;
use camdodge_data::ors::{OrsConfig, OrsDirectionsProvider};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::{
    ARG_BIND, ARG_CAMERAS, ARG_ORS_API_KEY, ARG_ORS_BASE_URL, ARG_PROFILE, ARG_TIMEOUT_SECS,
    CliError, DEFAULT_CAMERAS, ENV_SERVE_ORS_API_KEY, ors_config,
};

mod api_error;

use api_error::ApiError;

const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// CLI arguments for the `serve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "serve",
    long_about = "Serve GET /api/getRoute, which plans a camera-avoiding route \
                 and the direct route between two points through \
                 OpenRouteService. The camera dataset is re-read on every \
                 request.",
    about = "Serve the route planning HTTP API"
)]
#[ortho_config(prefix = "CAMDODGE")]
pub(crate) struct ServeArgs {
    /// Socket address to listen on.
    #[arg(long = ARG_BIND, value_name = "addr")]
    #[serde(default)]
    pub(crate) bind: Option<String>,
    /// Path to the camera dataset (JSON array).
    #[arg(long = ARG_CAMERAS, value_name = "path")]
    #[serde(default)]
    pub(crate) cameras: Option<Utf8PathBuf>,
    /// OpenRouteService API key.
    #[arg(long = ARG_ORS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) ors_api_key: Option<String>,
    /// OpenRouteService root URL.
    #[arg(long = ARG_ORS_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) ors_base_url: Option<String>,
    /// Routing profile, e.g. `foot-walking`.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Timeout for each OpenRouteService request.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ServeArgs {
    pub(crate) fn into_config(self) -> Result<ServeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ServeConfig::try_from(merged)
    }
}

/// Resolved `serve` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct ServeConfig {
    pub(crate) bind: SocketAddr,
    pub(crate) cameras: Utf8PathBuf,
    pub(crate) ors: OrsConfig,
}

impl ServeConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.cameras, ARG_CAMERAS)
    }
}

impl TryFrom<ServeArgs> for ServeConfig {
    type Error = CliError;

    fn try_from(args: ServeArgs) -> Result<Self, Self::Error> {
        let api_key = args.ors_api_key.ok_or(CliError::MissingArgument {
            field: ARG_ORS_API_KEY,
            env: ENV_SERVE_ORS_API_KEY,
        })?;
        let raw_bind = args.bind.unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind = raw_bind
            .parse::<SocketAddr>()
            .map_err(|source| CliError::InvalidBind {
                value: raw_bind,
                source,
            })?;
        let cameras = args
            .cameras
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CAMERAS));
        let ors = ors_config(api_key, args.ors_base_url, args.profile, args.timeout_secs)?;
        Ok(Self { bind, cameras, ors })
    }
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match camdodge_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

type SharedPlanner<P, C> = Arc<RoutePlanner<P, C>>;

/// Build the API router around a shared planner.
pub(crate) fn router<P, C>(planner: SharedPlanner<P, C>) -> Router
where
    P: DirectionsProvider + 'static,
    C: CameraSource + 'static,
{
    Router::new()
        .route("/api/getRoute", get(get_route::<P, C>))
        .route("/api/cameras", get(list_cameras::<P, C>))
        .route("/health", get(|| async { "OK" }))
        .with_state(planner)
}

async fn get_route<P, C>(
    State(planner): State<SharedPlanner<P, C>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<CombinedRouteResponse>, ApiError>
where
    P: DirectionsProvider,
    C: CameraSource,
{
    let request = RouteRequest::from_query(
        first_value(&params, "start"),
        first_value(&params, "end"),
    )?;
    let response = planner.plan(&request).await?;
    Ok(Json(response))
}

/// Repeated query keys resolve to their first occurrence.
fn first_value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

async fn list_cameras<P, C>(
    State(planner): State<SharedPlanner<P, C>>,
) -> Result<Json<Vec<Camera>>, ApiError>
where
    P: DirectionsProvider,
    C: CameraSource,
{
    planner
        .camera_source()
        .load_cameras()
        .map(Json)
        .map_err(ApiError::Cameras)
}

pub(super) async fn run_serve(args: ServeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let provider = OrsDirectionsProvider::with_config(config.ors.clone()).map_err(|source| {
        CliError::BuildProvider {
            base_url: config.ors.base_url.clone(),
            source,
        }
    })?;
    let planner = Arc::new(RoutePlanner::new(
        provider,
        JsonFileCameraSource::new(config.cameras.clone()),
    ));
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| CliError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(
        "serving routes on http://{} with cameras from {}",
        config.bind, config.cameras
    );
    axum::serve(listener, router(planner))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(CliError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ServeConfig, CliError> {
    let merged = ServeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ServeConfig::try_from(merged)
}
