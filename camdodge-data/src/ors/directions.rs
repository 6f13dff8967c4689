//! `DirectionsProvider` backed by the OpenRouteService directions API.

use async_trait::async_trait;
use camdodge_core::{DirectionsError, DirectionsProvider, DirectionsQuery, DirectionsResponse};
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use super::config::{OrsConfig, ProviderBuildError};
use super::wire::{DirectionsRequestBody, convert_directions};

/// Directions provider calling `POST {base_url}/v2/directions/{profile}`.
///
/// The HTTP client is built once and reused, so a single provider can serve
/// every request of a running server. No call is retried.
pub struct OrsDirectionsProvider {
    client: Client,
    config: OrsConfig,
    url: Url,
}

impl std::fmt::Debug for OrsDirectionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsDirectionsProvider")
            .field("config", &self.config)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl OrsDirectionsProvider {
    /// Create a provider from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: OrsConfig) -> Result<Self, ProviderBuildError> {
        let url = config.endpoint(&format!("v2/directions/{}", config.profile))?;
        let client = config.client()?;
        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// The directions endpoint requests are posted to.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> DirectionsError {
        if error.is_timeout() {
            return DirectionsError::Timeout {
                url: self.url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        DirectionsError::Network {
            url: self.url.to_string(),
            message: error.to_string(),
        }
    }

    fn convert_status(&self, status: StatusCode, bytes: &[u8]) -> DirectionsError {
        let body = serde_json::from_slice::<Value>(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()));
        DirectionsError::Http {
            url: self.url.to_string(),
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl DirectionsProvider for OrsDirectionsProvider {
    async fn directions(
        &self,
        query: &DirectionsQuery,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let body = DirectionsRequestBody::from(query);
        debug!(
            "POST {} (instructions: {}, avoid zones: {})",
            self.url,
            query.instructions,
            query.avoid.as_ref().map_or(0, |zones| zones.0.len())
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(AUTHORIZATION, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;

        if !status.is_success() {
            return Err(self.convert_status(status, &bytes));
        }
        let raw: Value = serde_json::from_slice(&bytes).map_err(|err| DirectionsError::Parse {
            message: err.to_string(),
        })?;
        convert_directions(raw)
    }
}
