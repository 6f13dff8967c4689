//! Connection settings shared by the OpenRouteService clients.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use url::Url;

/// Public OpenRouteService endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openrouteservice.org";

/// Routing profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "foot-walking";

/// Default user agent for OpenRouteService requests.
pub const DEFAULT_USER_AGENT: &str = "camdodge/0.1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for OpenRouteService client construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not an absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// Offending value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the OpenRouteService clients.
///
/// The API key is sent with every request and is never printed by the
/// `Debug` implementation.
#[derive(Clone)]
pub struct OrsConfig {
    /// Service root, e.g. `"https://api.openrouteservice.org"`.
    pub base_url: String,
    /// API key issued by OpenRouteService.
    pub api_key: String,
    /// Routing profile such as `foot-walking` or `driving-car`.
    pub profile: String,
    /// Per-request timeout, also used as the connect timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for OrsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("profile", &self.profile)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl OrsConfig {
    /// Create a configuration for the public service using `api_key`.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the clients at a different deployment.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolve `path` against the base URL.
    ///
    /// Trailing slashes on the base URL are ignored.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderBuildError> {
        let joined = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    /// Build the HTTP client these settings describe.
    pub(crate) fn client(&self) -> Result<Client, ProviderBuildError> {
        Client::builder()
            .user_agent(&self.user_agent)
            .connect_timeout(self.timeout)
            .timeout(self.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)
    }
}
