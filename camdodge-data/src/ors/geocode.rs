//! `Geocoder` backed by the OpenRouteService search API.

use async_trait::async_trait;
use camdodge_core::{GeocodeError, Geocoder};
use geo::Coord;
use log::debug;
use reqwest::Client;
use url::Url;

use super::config::{OrsConfig, ProviderBuildError};
use super::wire::FeatureCollection;

/// Geocoder calling `GET {base_url}/geocode/search`.
///
/// Only the best match is requested. Error messages carry the endpoint
/// without its query string so the API key never ends up in logs.
pub struct OrsGeocoder {
    client: Client,
    config: OrsConfig,
    url: Url,
}

impl std::fmt::Debug for OrsGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrsGeocoder")
            .field("config", &self.config)
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl OrsGeocoder {
    /// Create a geocoder from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client fails
    /// to build.
    pub fn with_config(config: OrsConfig) -> Result<Self, ProviderBuildError> {
        let url = config.endpoint("geocode/search")?;
        let client = config.client()?;
        Ok(Self {
            client,
            config,
            url,
        })
    }

    fn search_url(&self, text: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("text", text)
            .append_pair("size", "1");
        url
    }

    fn network_error(&self, error: reqwest::Error) -> GeocodeError {
        GeocodeError::Network {
            url: self.url.to_string(),
            message: error.without_url().to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for OrsGeocoder {
    async fn geocode(&self, text: &str) -> Result<Coord<f64>, GeocodeError> {
        debug!("geocoding {text:?} via {}", self.url);
        let response = self
            .client
            .get(self.search_url(text))
            .send()
            .await
            .map_err(|err| self.network_error(err))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Http {
                url: self.url.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        let collection: FeatureCollection =
            response.json().await.map_err(|err| GeocodeError::Parse {
                message: err.without_url().to_string(),
            })?;
        collection
            .features
            .into_iter()
            .next()
            .map(|feature| {
                let [x, y] = feature.geometry.coordinates;
                Coord { x, y }
            })
            .ok_or_else(|| GeocodeError::NotFound {
                query: text.to_owned(),
            })
    }
}
