//! Open-Meteo forecast fetch and normalization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;
use tripcast_core::config::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};
use tripcast_core::{ReqwestErrorExt, WeatherConfig};

use crate::retry::{with_retry, RetryConfig};
use crate::types::{DailyPoint, Forecast, HourlyPoint, WeatherError};

const HOURLY_FIELDS: &str = "temperature_2m,precipitation,wind_speed_10m,cloudcover,snowfall";
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,snowfall_sum,sunrise,sunset";

/// Open-Meteo returns each variable as a column parallel to `time`.
#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: String,
    hourly: ApiHourly,
    daily: ApiDaily,
}

#[derive(Debug, Deserialize)]
struct ApiHourly {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    cloudcover: Vec<Option<f64>>,
    #[serde(default)]
    snowfall: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ApiDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    snowfall_sum: Vec<Option<f64>>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
}

/// Value at `i` of a column; short or absent columns read as missing.
fn at<T: Clone>(column: &[Option<T>], i: usize) -> Option<T> {
    column.get(i).cloned().flatten()
}

impl From<ApiForecastResponse> for Forecast {
    fn from(api: ApiForecastResponse) -> Self {
        let h = api.hourly;
        let hourly = h
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| HourlyPoint {
                time: time.clone(),
                temperature_2m: at(&h.temperature_2m, i),
                precipitation: at(&h.precipitation, i),
                wind_speed_10m: at(&h.wind_speed_10m, i),
                cloudcover: at(&h.cloudcover, i),
                snowfall: at(&h.snowfall, i),
            })
            .collect();

        let d = api.daily;
        let daily = d
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| DailyPoint {
                date: date.clone(),
                temperature_2m_max: at(&d.temperature_2m_max, i),
                temperature_2m_min: at(&d.temperature_2m_min, i),
                precipitation_sum: at(&d.precipitation_sum, i),
                snowfall_sum: at(&d.snowfall_sum, i),
                sunrise: at(&d.sunrise, i),
                sunset: at(&d.sunset, i),
            })
            .collect();

        Self {
            latitude: api.latitude,
            longitude: api.longitude,
            timezone: api.timezone,
            hourly,
            daily,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForecastProvider {
    client: Arc<Client>,
    base_url: String,
    retry: RetryConfig,
}

impl ForecastProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.forecast_api_url.clone(),
            retry: RetryConfig::with_max_retries(config.max_retries),
        })
    }

    /// Fetch an hourly + daily forecast for the given coordinates.
    ///
    /// `forecast_days` is clamped to what the API accepts (1..=16).
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
        forecast_days: u8,
    ) -> Result<Forecast, WeatherError> {
        let days = forecast_days
            .clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
            .to_string();
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();
        let params = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("hourly", HOURLY_FIELDS),
            ("daily", DAILY_FIELDS),
            ("timezone", timezone),
            ("forecast_days", days.as_str()),
        ];
        tracing::debug!("Forecast request params: {:?}", params);

        let response = with_retry(&self.retry, || {
            self.client.get(&self.base_url).query(&params).send()
        })
        .await
        .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast returned status {}", status);
            return Err(WeatherError::ForecastUnavailable(status.as_u16().to_string()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| e.into_network_error())?;
        let api: ApiForecastResponse = serde_json::from_slice(&body)
            .map_err(|e| WeatherError::InvalidResponse(format!("forecast: {}", e)))?;

        let forecast = Forecast::from(api);
        tracing::debug!(
            "Forecast has {} hourly and {} daily points",
            forecast.hourly.len(),
            forecast.daily.len()
        );
        Ok(forecast)
    }
}
