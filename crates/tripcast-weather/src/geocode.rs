//! Forward geocoding: place name to candidate coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use tripcast_core::{ReqwestErrorExt, WeatherConfig};

use crate::retry::{with_retry, RetryConfig};
use crate::types::{CitySuggestion, WeatherError};

const USER_AGENT: &str = concat!("tripcast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<CitySuggestion>,
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Arc<Client>,
    base_url: String,
    retry: RetryConfig,
}

impl GeocodeClient {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.geocoding_api_url.clone(),
            retry: RetryConfig::with_max_retries(config.max_retries),
        })
    }

    /// Search for places matching `name`.
    ///
    /// A blank name returns no suggestions without contacting the API.
    #[instrument(skip(self), level = "info")]
    pub async fn search(
        &self,
        name: &str,
        limit: u32,
        language: &str,
    ) -> Result<Vec<CitySuggestion>, WeatherError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let count = limit.to_string();
        let params = [("name", name), ("count", count.as_str()), ("language", language)];

        let response = with_retry(&self.retry, || {
            self.client.get(&self.base_url).query(&params).send()
        })
        .await
        .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Geocoding returned status {}", status);
            return Err(WeatherError::GeocodingUnavailable(status.as_u16().to_string()));
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(format!("geocoding: {}", e)))?;

        tracing::debug!("Geocoding found {} candidates for {:?}", body.results.len(), name);
        Ok(body.results)
    }
}
