//! Command-line interface for the camdodge route planner.
//!
//! Three subcommands share one configuration scheme. Every option can come
//! from a CLI flag, a `CAMDODGE_CMDS_<COMMAND>_<OPTION>` environment variable
//! or a configuration file, merged by `ortho_config`.
//!
//! - `serve` exposes the planner over HTTP.
//! - `route` plans a single route and prints it as JSON.
//! - `watch` polls a camera's image feed into a directory.
#![forbid(unsafe_code)]

use std::time::Duration;

use camdodge_data::ors::OrsConfig;
use clap::{Parser, Subcommand};

mod error;
mod route;
mod server;
mod watch;

pub use error::CliError;

use route::RouteArgs;
use server::ServeArgs;
use watch::WatchArgs;

const ARG_BIND: &str = "bind";
const ARG_CAMERAS: &str = "cameras";
const ARG_ORS_API_KEY: &str = "ors-api-key";
const ARG_ORS_BASE_URL: &str = "ors-base-url";
const ARG_PROFILE: &str = "profile";
const ARG_TIMEOUT_SECS: &str = "timeout-secs";
const ARG_FROM: &str = "from";
const ARG_TO: &str = "to";
const ARG_CAMERA_ID: &str = "camera-id";
const ARG_FEED_BASE_URL: &str = "feed-base-url";
const ARG_OUT_DIR: &str = "out-dir";
const ARG_INTERVAL_SECS: &str = "interval-secs";
const ARG_COUNT: &str = "count";

const ENV_SERVE_ORS_API_KEY: &str = "CAMDODGE_CMDS_SERVE_ORS_API_KEY";
const ENV_ROUTE_ORS_API_KEY: &str = "CAMDODGE_CMDS_ROUTE_ORS_API_KEY";
const ENV_ROUTE_FROM: &str = "CAMDODGE_CMDS_ROUTE_FROM";
const ENV_ROUTE_TO: &str = "CAMDODGE_CMDS_ROUTE_TO";
const ENV_WATCH_CAMERA_ID: &str = "CAMDODGE_CMDS_WATCH_CAMERA_ID";
const ENV_WATCH_FEED_BASE_URL: &str = "CAMDODGE_CMDS_WATCH_FEED_BASE_URL";

const DEFAULT_CAMERAS: &str = "data/cameras.json";

/// Run the camdodge CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration or the selected
/// command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    match cli.command {
        Command::Serve(args) => runtime.block_on(server::run_serve(args)),
        Command::Route(args) => runtime.block_on(route::run_route(args)),
        Command::Watch(args) => runtime.block_on(watch::run_watch(args)),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "camdodge",
    about = "Plan walking routes that steer clear of surveillance cameras",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the route planning HTTP API.
    Serve(ServeArgs),
    /// Plan one route and print it as JSON.
    Route(RouteArgs),
    /// Save snapshots from a camera's live feed.
    Watch(WatchArgs),
}

/// Assemble OpenRouteService settings from merged options.
fn ors_config(
    api_key: String,
    base_url: Option<String>,
    profile: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<OrsConfig, CliError> {
    let mut config = OrsConfig::new(api_key);
    if let Some(url) = base_url {
        config = config.with_base_url(url);
    }
    if let Some(name) = profile {
        config = config.with_profile(name);
    }
    match timeout_secs {
        Some(0) => {
            return Err(CliError::InvalidArgument {
                field: ARG_TIMEOUT_SECS,
                reason: "must be at least one second".to_owned(),
            });
        }
        Some(secs) => config = config.with_timeout(Duration::from_secs(secs)),
        None => {}
    }
    Ok(config)
}

#[cfg(test)]
mod tests;
