//! Focused unit tests covering argument parsing and `serve` configuration.

use super::helpers::Workspace;
use super::*;
use crate::server::{ServeArgs, ServeConfig, config_from_layers_for_test, require_existing};
use camdodge_data::ors::{DEFAULT_BASE_URL, DEFAULT_PROFILE};
use camino::Utf8PathBuf;
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::json;
use std::fs;

#[rstest]
fn parses_serve_flags() {
    let cli = Cli::try_parse_from([
        "camdodge",
        "serve",
        "--bind",
        "0.0.0.0:8080",
        "--ors-api-key",
        "secret",
        "--timeout-secs",
        "5",
    ])
    .expect("serve flags should parse");

    match cli.command {
        Command::Serve(args) => {
            assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
            assert_eq!(args.ors_api_key.as_deref(), Some("secret"));
            assert_eq!(args.timeout_secs, Some(5));
        }
        other => panic!("expected serve, found {other:?}"),
    }
}

#[rstest]
fn rejects_unknown_subcommands() {
    let err = Cli::try_parse_from(["camdodge", "teleport"]).expect_err("should fail");
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
}

#[rstest]
fn serve_requires_an_api_key() {
    let err = ServeConfig::try_from(ServeArgs::default()).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_ORS_API_KEY);
            assert_eq!(env, ENV_SERVE_ORS_API_KEY);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn serve_fills_in_defaults() {
    let args = ServeArgs {
        ors_api_key: Some("secret".to_owned()),
        ..ServeArgs::default()
    };

    let config = ServeConfig::try_from(args).expect("config should build");

    assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
    assert_eq!(config.cameras, Utf8PathBuf::from("data/cameras.json"));
    assert_eq!(config.ors.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.ors.profile, DEFAULT_PROFILE);
    assert_eq!(config.ors.api_key, "secret");
}

#[rstest]
fn serve_rejects_bad_bind_addresses() {
    let args = ServeArgs {
        ors_api_key: Some("secret".to_owned()),
        bind: Some("localhost".to_owned()),
        ..ServeArgs::default()
    };

    let err = ServeConfig::try_from(args).expect_err("bind should be rejected");

    match err {
        CliError::InvalidBind { value, .. } => assert_eq!(value, "localhost"),
        other => panic!("expected InvalidBind, found {other:?}"),
    }
}

#[rstest]
fn zero_timeout_is_rejected() {
    let args = ServeArgs {
        ors_api_key: Some("secret".to_owned()),
        timeout_secs: Some(0),
        ..ServeArgs::default()
    };

    let err = ServeConfig::try_from(args).expect_err("timeout should be rejected");

    match err {
        CliError::InvalidArgument { field, .. } => assert_eq!(field, ARG_TIMEOUT_SECS),
        other => panic!("expected InvalidArgument, found {other:?}"),
    }
}

#[rstest]
fn ors_options_override_defaults() {
    let config = ors_config(
        "secret".to_owned(),
        Some("http://ors.internal:8080/ors".to_owned()),
        Some("cycling-regular".to_owned()),
        Some(12),
    )
    .expect("config should build");

    assert_eq!(config.base_url, "http://ors.internal:8080/ors");
    assert_eq!(config.profile, "cycling-regular");
    assert_eq!(config.timeout, std::time::Duration::from_secs(12));
}

#[rstest]
fn require_existing_accepts_files() {
    let workspace = Workspace::new();
    let cameras = workspace.write("cameras.json", b"[]");

    require_existing(&cameras, ARG_CAMERAS).expect("file should be accepted");
}

#[rstest]
fn require_existing_reports_missing_files() {
    let workspace = Workspace::new();
    let missing = workspace.root().join("absent.json");

    let err = require_existing(&missing, ARG_CAMERAS).expect_err("missing file");

    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_CAMERAS);
            assert_eq!(path, missing);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn require_existing_rejects_directories() {
    let workspace = Workspace::new();
    let dir = workspace.root().join("cameras.json");
    fs::create_dir(&dir).expect("create directory");

    let err = require_existing(&dir, ARG_CAMERAS).expect_err("directory");

    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_CAMERAS),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "timeout_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "bind": "127.0.0.1:4000",
            "ors_api_key": "from-file",
            "profile": "driving-car",
        }),
        None,
    );
    composer.push_environment(json!({
        "ors_api_key": "from-env",
        "cameras": "/srv/cameras.json",
    }));
    composer.push_cli(json!({ "bind": "127.0.0.1:5000" }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");

    assert_eq!(config.bind.to_string(), "127.0.0.1:5000");
    assert_eq!(config.ors.api_key, "from-env");
    assert_eq!(config.ors.profile, "driving-car");
    assert_eq!(config.cameras, Utf8PathBuf::from("/srv/cameras.json"));
}
