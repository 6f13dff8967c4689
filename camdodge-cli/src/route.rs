//! `route` command: plan one route and print it as JSON.

use std::io::Write;

use camdodge_core::{
    CameraSource, CombinedRouteResponse, DirectionsProvider, Geocoder, RoutePlanner, RouteRequest,
    parse_pair,
};
use camdodge_data::cameras::JsonFileCameraSource;
use camdodge_data::ors::{OrsConfig, OrsDirectionsProvider, OrsGeocoder};
use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::server::require_existing;
use crate::{
    ARG_CAMERAS, ARG_FROM, ARG_ORS_API_KEY, ARG_ORS_BASE_URL, ARG_PROFILE, ARG_TIMEOUT_SECS,
    ARG_TO, CliError, DEFAULT_CAMERAS, ENV_ROUTE_FROM, ENV_ROUTE_ORS_API_KEY, ENV_ROUTE_TO,
    ors_config,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "route",
    long_about = "Plan a camera-avoiding route and the direct route between \
                 two places and print both as JSON. Endpoints are `lon,lat` \
                 pairs or free-text addresses, which are geocoded first.",
    about = "Plan one route and print it as JSON"
)]
#[ortho_config(prefix = "CAMDODGE")]
pub(crate) struct RouteArgs {
    /// Start point: `lon,lat` or an address.
    #[arg(long = ARG_FROM, value_name = "place")]
    #[serde(default)]
    pub(crate) from: Option<String>,
    /// End point: `lon,lat` or an address.
    #[arg(long = ARG_TO, value_name = "place")]
    #[serde(default)]
    pub(crate) to: Option<String>,
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

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct RouteConfig {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) cameras: Utf8PathBuf,
    pub(crate) ors: OrsConfig,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let from = args.from.ok_or(CliError::MissingArgument {
            field: ARG_FROM,
            env: ENV_ROUTE_FROM,
        })?;
        let to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_ROUTE_TO,
        })?;
        let api_key = args.ors_api_key.ok_or(CliError::MissingArgument {
            field: ARG_ORS_API_KEY,
            env: ENV_ROUTE_ORS_API_KEY,
        })?;
        let cameras = args
            .cameras
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CAMERAS));
        let ors = ors_config(api_key, args.ors_base_url, args.profile, args.timeout_secs)?;
        Ok(Self {
            from,
            to,
            cameras,
            ors,
        })
    }
}

pub(super) async fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.cameras, ARG_CAMERAS)?;
    let build_error = |source| CliError::BuildProvider {
        base_url: config.ors.base_url.clone(),
        source,
    };
    let geocoder = OrsGeocoder::with_config(config.ors.clone()).map_err(build_error)?;
    let provider = OrsDirectionsProvider::with_config(config.ors.clone()).map_err(build_error)?;
    let planner = RoutePlanner::new(provider, JsonFileCameraSource::new(config.cameras.clone()));
    let mut stdout = std::io::stdout().lock();
    run_route_with(&config.from, &config.to, &geocoder, &planner, &mut stdout).await
}

/// Resolve both endpoints, plan, and write the response to `writer`.
pub(super) async fn run_route_with<P, C>(
    from: &str,
    to: &str,
    geocoder: &dyn Geocoder,
    planner: &RoutePlanner<P, C>,
    writer: &mut dyn Write,
) -> Result<(), CliError>
where
    P: DirectionsProvider,
    C: CameraSource,
{
    let origin = resolve_endpoint(ARG_FROM, from, geocoder).await?;
    let destination = resolve_endpoint(ARG_TO, to, geocoder).await?;
    let response = planner
        .plan(&RouteRequest::new(origin, destination))
        .await
        .map_err(CliError::Plan)?;
    info!(
        "planned route with {} points avoiding {} cameras",
        response.route.len(),
        response.avoided_camera_count
    );
    write_route_response(writer, &response)
}

/// Parse `value` as `lon,lat`, geocoding it when it is not a coordinate pair.
async fn resolve_endpoint(
    field: &'static str,
    value: &str,
    geocoder: &dyn Geocoder,
) -> Result<Coord<f64>, CliError> {
    if let Ok(coord) = parse_pair(field, Some(value)) {
        return Ok(coord);
    }
    debug!("geocoding --{field} {value:?}");
    geocoder
        .geocode(value)
        .await
        .map_err(|source| CliError::Geocode { field, source })
}

fn write_route_response(
    writer: &mut dyn Write,
    response: &CombinedRouteResponse,
) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(response).map_err(CliError::SerialiseRouteResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
