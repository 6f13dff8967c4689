//! Error types emitted by the camdodge CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use camdodge_core::{GeocodeError, PlanError};
use camdodge_data::ors::ProviderBuildError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the camdodge CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// An option was supplied with an unusable value.
    #[error("invalid {field}: {reason}")]
    InvalidArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
    /// The listen address could not be parsed.
    #[error("invalid bind address {value:?}: {source}")]
    InvalidBind {
        /// Value as configured.
        value: String,
        /// Parser error.
        #[source]
        source: AddrParseError,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Building an OpenRouteService client failed.
    #[error("failed to build OpenRouteService client for {base_url}: {source}")]
    BuildProvider {
        /// Configured service root.
        base_url: String,
        /// Construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// Building the snapshot HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be started.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Binding the HTTP listener failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The HTTP server stopped with an error.
    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
    /// An address given to `route` could not be geocoded.
    #[error("failed to resolve --{field}: {source}")]
    Geocode {
        /// `from` or `to`.
        field: &'static str,
        /// Geocoder error.
        #[source]
        source: GeocodeError,
    },
    /// Route planning failed.
    #[error("failed to plan route: {0}")]
    Plan(#[source] PlanError),
    /// Serialising the planned route failed.
    #[error("failed to serialise route response: {0}")]
    SerialiseRouteResponse(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// The snapshot directory could not be created.
    #[error("failed to create output directory {path:?}: {source}")]
    CreateOutputDir {
        /// Directory path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A snapshot could not be written to disk.
    #[error("failed to write snapshot {path:?}: {source}")]
    WriteSnapshot {
        /// Target file.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}
