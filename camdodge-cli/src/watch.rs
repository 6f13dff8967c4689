//! `watch` command: save a camera's live images to disk.

use std::future::Future;
use std::time::{Duration, UNIX_EPOCH};

use camdodge_data::feed::{
    DEFAULT_INTERVAL, HttpSnapshotFetcher, PollerConfig, Snapshot, SnapshotFetcher, SnapshotPoller,
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CAMERA_ID, ARG_COUNT, ARG_FEED_BASE_URL, ARG_INTERVAL_SECS, ARG_OUT_DIR, CliError,
    ENV_WATCH_CAMERA_ID, ENV_WATCH_FEED_BASE_URL,
};

const DEFAULT_OUT_DIR: &str = "snapshots";

/// CLI arguments for the `watch` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "watch",
    long_about = "Poll a camera's image feed and write every fetched frame \
                 to a directory until interrupted or until --count frames \
                 have been saved.",
    about = "Save snapshots from a camera's live feed"
)]
#[ortho_config(prefix = "CAMDODGE")]
pub(crate) struct WatchArgs {
    /// Identifier of the camera to poll.
    #[arg(long = ARG_CAMERA_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) camera_id: Option<String>,
    /// Root URL of the camera feed service.
    #[arg(long = ARG_FEED_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) feed_base_url: Option<String>,
    /// Directory receiving the images.
    #[arg(long = ARG_OUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) out_dir: Option<Utf8PathBuf>,
    /// Seconds between fetches.
    #[arg(long = ARG_INTERVAL_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) interval_secs: Option<u64>,
    /// Stop after saving this many images.
    #[arg(long = ARG_COUNT, value_name = "n")]
    #[serde(default)]
    pub(crate) count: Option<usize>,
}

impl WatchArgs {
    pub(crate) fn into_config(self) -> Result<WatchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        WatchConfig::try_from(merged)
    }
}

/// Resolved `watch` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WatchConfig {
    pub(crate) camera_id: String,
    pub(crate) feed_base_url: String,
    pub(crate) out_dir: Utf8PathBuf,
    pub(crate) poller: PollerConfig,
    pub(crate) count: Option<usize>,
}

impl TryFrom<WatchArgs> for WatchConfig {
    type Error = CliError;

    fn try_from(args: WatchArgs) -> Result<Self, Self::Error> {
        let camera_id = args.camera_id.ok_or(CliError::MissingArgument {
            field: ARG_CAMERA_ID,
            env: ENV_WATCH_CAMERA_ID,
        })?;
        let feed_base_url = args.feed_base_url.ok_or(CliError::MissingArgument {
            field: ARG_FEED_BASE_URL,
            env: ENV_WATCH_FEED_BASE_URL,
        })?;
        let interval = match args.interval_secs {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_INTERVAL_SECS,
                    reason: "must be at least one second".to_owned(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_INTERVAL,
        };
        Ok(Self {
            camera_id,
            feed_base_url,
            out_dir: args
                .out_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUT_DIR)),
            poller: PollerConfig {
                interval,
                ..PollerConfig::default()
            },
            count: args.count,
        })
    }
}

pub(super) async fn run_watch(args: WatchArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let client = reqwest::Client::builder()
        .build()
        .map_err(CliError::HttpClient)?;
    let fetcher = HttpSnapshotFetcher::new(client, config.feed_base_url.clone());
    let saved = run_watch_with(&config, fetcher, interrupted()).await?;
    info!("saved {saved} snapshots of {} to {}", config.camera_id, config.out_dir);
    Ok(())
}

/// Poll `fetcher` and store each new image until `shutdown` resolves or the
/// configured count is reached. Returns the number of images written.
pub(super) async fn run_watch_with<F, S>(
    config: &WatchConfig,
    fetcher: F,
    shutdown: S,
) -> Result<usize, CliError>
where
    F: SnapshotFetcher + 'static,
    S: Future<Output = ()>,
{
    camdodge_fs::create_dir_all(&config.out_dir).map_err(|source| {
        CliError::CreateOutputDir {
            path: config.out_dir.clone(),
            source,
        }
    })?;
    let poller = SnapshotPoller::start(fetcher, config.camera_id.clone(), config.poller);
    let mut updates = poller.subscribe();
    tokio::pin!(shutdown);
    let mut saved = 0_usize;
    let outcome = loop {
        if config.count.is_some_and(|limit| saved >= limit) {
            break Ok(());
        }
        tokio::select! {
            biased;
            () = &mut shutdown => break Ok(()),
            changed = updates.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let latest = updates.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    if let Err(err) = save_snapshot(&config.out_dir, &snapshot, saved) {
                        break Err(err);
                    }
                    saved += 1;
                }
            }
        }
    };
    poller.stop().await;
    outcome.map(|()| saved)
}

fn save_snapshot(dir: &Utf8Path, snapshot: &Snapshot, sequence: usize) -> Result<(), CliError> {
    let path = dir.join(snapshot_file_name(snapshot, sequence));
    camdodge_fs::write_file(&path, &snapshot.bytes)
        .map_err(|source| CliError::WriteSnapshot { path, source })
}

/// `<camera>-<millis>-<sequence>.jpg`, with path-unsafe characters in the id
/// replaced.
fn snapshot_file_name(snapshot: &Snapshot, sequence: usize) -> String {
    let millis = snapshot
        .fetched_at
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis());
    let camera: String = snapshot
        .camera_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{camera}-{millis}-{sequence:04}.jpg")
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for interrupt: {err}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<WatchConfig, CliError> {
    let merged = WatchArgs::merge_from_layers(layers).map_err(CliError::from)?;
    WatchConfig::try_from(merged)
}
