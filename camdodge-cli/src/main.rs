//! Entry point for the `camdodge` binary.
#![forbid(unsafe_code)]

use std::process::ExitCode;

use camdodge_cli::{CliError, run};
use env_logger::Env;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        // Help and version requests surface as clap errors; let clap print them.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            log::error!("camdodge: {err}");
            ExitCode::FAILURE
        }
    }
}
