//! Forecast, place and error types shared across the weather crate.

use serde::{Deserialize, Serialize};
use tripcast_core::NetworkError;

/// Normalized forecast for one location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub hourly: Vec<HourlyPoint>,
    pub daily: Vec<DailyPoint>,
}

/// Hourly forecast sample. `None` marks a missing value upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed_10m: Option<f64>,
    pub cloudcover: Option<f64>,
    pub snowfall: Option<f64>,
}

/// Daily forecast aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
    pub precipitation_sum: Option<f64>,
    pub snowfall_sum: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Candidate place returned by geocoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySuggestion {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl CitySuggestion {
    /// "Name, Region, Country" with missing parts skipped
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Weather collaborator errors.
///
/// Scoring never fails; these come from resolving a place or loading its
/// forecast.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City with name {0} not found")]
    PlaceNotFound(String),
    #[error("Geocoding failed: {0}")]
    GeocodingUnavailable(String),
    #[error("Forecast failed: {0}")]
    ForecastUnavailable(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PlaceNotFound(_) => "Place not found. Check the spelling and try again.",
            Self::GeocodingUnavailable(_) => "Place search is unavailable. Please try again later.",
            Self::ForecastUnavailable(_) => "Forecast is unavailable. Please try again later.",
            Self::InvalidResponse(_) => "Weather service returned unexpected data.",
            Self::Network(e) => e.user_message(),
        }
    }
}
