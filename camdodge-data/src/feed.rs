//! Periodic polling of a camera's live image feed.
//!
//! A [`SnapshotPoller`] owns one Tokio task per camera. The task waits for
//! the initial delay, then fetches a fresh image on every interval tick and
//! publishes it on a `watch` channel. Stopping the poller cancels the task
//! and waits for it to finish; dropping it only cancels.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Delay before the first fetch.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);

/// Time between fetches.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Errors from fetching a single snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The feed could not be reached.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The feed answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The feed root cannot carry an image path.
    #[error("invalid feed base URL {base_url}: {message}")]
    InvalidBaseUrl {
        /// Configured feed root.
        base_url: String,
        /// Why the URL was rejected.
        message: String,
    },
}

/// One image fetched from a camera feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Camera the image belongs to.
    pub camera_id: String,
    /// When the fetch completed.
    pub fetched_at: SystemTime,
    /// Encoded image bytes as served by the feed.
    pub bytes: Vec<u8>,
}

/// Fetch the current image of a camera.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Return the encoded image for `camera_id`.
    async fn fetch(&self, camera_id: &str) -> Result<Vec<u8>, SnapshotError>;
}

#[async_trait]
impl<T: SnapshotFetcher + ?Sized> SnapshotFetcher for Arc<T> {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<u8>, SnapshotError> {
        (**self).fetch(camera_id).await
    }
}

/// Fetcher for `GET {base_url}/api/cameras/{id}/image?t=<millis>`.
///
/// The timestamp defeats intermediate caches. The camera id is
/// percent-encoded as a single path segment.
#[derive(Debug, Clone)]
pub struct HttpSnapshotFetcher {
    client: Client,
    base_url: String,
}

impl HttpSnapshotFetcher {
    /// Create a fetcher for the feed rooted at `base_url`.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn image_url(&self, camera_id: &str, at: SystemTime) -> Result<Url, SnapshotError> {
        let invalid = |message: String| SnapshotError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            message,
        };
        let mut url = Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["api", "cameras", camera_id, "image"]);
        let millis = at
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        url.query_pairs_mut()
            .clear()
            .append_pair("t", &millis.to_string());
        Ok(url)
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self, camera_id: &str) -> Result<Vec<u8>, SnapshotError> {
        let url = self.image_url(camera_id, SystemTime::now())?;
        let network = |err: reqwest::Error| SnapshotError::Network {
            url: url.to_string(),
            message: err.to_string(),
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(network)?;
        Ok(bytes.to_vec())
    }
}

/// Timing of a [`SnapshotPoller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Wait before the first fetch.
    pub initial_delay: Duration,
    /// Wait between fetches.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            initial_delay: DEFAULT_INITIAL_DELAY,
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Handle to a running polling task.
///
/// # Examples
///
/// ```no_run
/// use camdodge_data::feed::{HttpSnapshotFetcher, PollerConfig, SnapshotPoller};
///
/// # async fn run() {
/// let fetcher = HttpSnapshotFetcher::new(reqwest::Client::new(), "https://feeds.example.com");
/// let poller = SnapshotPoller::start(fetcher, "cam-42", PollerConfig::default());
/// let mut updates = poller.subscribe();
/// if updates.changed().await.is_ok() {
///     let latest = updates.borrow().clone();
///     log::info!("got {:?} bytes", latest.map(|s| s.bytes.len()));
/// }
/// poller.stop().await;
/// # }
/// ```
#[derive(Debug)]
pub struct SnapshotPoller {
    camera_id: String,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    updates: watch::Receiver<Option<Snapshot>>,
}

impl SnapshotPoller {
    /// Spawn a polling task for `camera_id` on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn start<F>(fetcher: F, camera_id: impl Into<String>, config: PollerConfig) -> Self
    where
        F: SnapshotFetcher + 'static,
    {
        let id = camera_id.into();
        let cancel = CancellationToken::new();
        let (sender, updates) = watch::channel(None);
        let task = tokio::spawn(poll(fetcher, id.clone(), config, sender, cancel.clone()));
        Self {
            camera_id: id,
            cancel,
            task: Some(task),
            updates,
        }
    }

    /// Camera this poller fetches.
    #[must_use]
    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    /// Receiver notified on every new snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.updates.clone()
    }

    /// Most recent snapshot, if any fetch has succeeded yet.
    #[must_use]
    pub fn latest(&self) -> Option<Snapshot> {
        self.updates.borrow().clone()
    }

    /// Cancel the task and wait for it to finish.
    ///
    /// No fetch starts after this returns.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("snapshot poller for {} ended abnormally: {err}", self.camera_id);
            }
        }
    }
}

impl Drop for SnapshotPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll<F: SnapshotFetcher>(
    fetcher: F,
    camera_id: String,
    config: PollerConfig,
    sender: watch::Sender<Option<Snapshot>>,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        () = sleep(config.initial_delay) => {}
    }
    let mut ticks = interval(config.interval.max(MIN_INTERVAL));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticks.tick() => {}
        }
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            outcome = fetcher.fetch(&camera_id) => outcome,
        };
        match outcome {
            Ok(bytes) => {
                debug!("snapshot for {camera_id}: {} bytes", bytes.len());
                sender.send_replace(Some(Snapshot {
                    camera_id: camera_id.clone(),
                    fetched_at: SystemTime::now(),
                    bytes,
                }));
            }
            Err(err) => warn!("skipping snapshot for {camera_id}: {err}"),
        }
    }
    debug!("snapshot poller for {camera_id} stopped");
}
