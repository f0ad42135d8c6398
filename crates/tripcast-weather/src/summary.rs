//! Forecast summarization: reduce the near-term window to scalar features.

use crate::types::{DailyPoint, Forecast};

/// Days of daily data considered for scoring
pub const DAILY_WINDOW: usize = 3;
/// Hours of hourly data considered for scoring
pub const HOURLY_WINDOW: usize = 72;

/// Scalar features derived from a forecast window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureVector {
    /// Mean daily midpoint temperature (°C)
    pub avg_temp: f64,
    /// Total daily precipitation (mm)
    pub total_precip: f64,
    /// Total daily snowfall (mm)
    pub total_snow: f64,
    /// Mean hourly 10m wind speed (m/s)
    pub avg_wind: f64,
    /// Mean hourly cloud cover (%)
    pub avg_cloud: f64,
    /// Mean hourly precipitation (mm/h)
    pub avg_precip_hourly: f64,
}

/// Summarize the first 3 days and first 72 hours of a forecast.
///
/// Missing samples count as zero. Shorter series are used as-is and an empty
/// window averages to zero.
pub fn summarize(forecast: &Forecast) -> FeatureVector {
    let days = &forecast.daily[..forecast.daily.len().min(DAILY_WINDOW)];
    let hours = &forecast.hourly[..forecast.hourly.len().min(HOURLY_WINDOW)];

    FeatureVector {
        avg_temp: mean(days.iter().map(midpoint_temp)),
        total_precip: days.iter().map(|d| value(d.precipitation_sum)).sum(),
        total_snow: days.iter().map(|d| value(d.snowfall_sum)).sum(),
        avg_wind: mean(hours.iter().map(|h| value(h.wind_speed_10m))),
        avg_cloud: mean(hours.iter().map(|h| value(h.cloudcover))),
        avg_precip_hourly: mean(hours.iter().map(|h| value(h.precipitation))),
    }
}

fn midpoint_temp(day: &DailyPoint) -> f64 {
    (value(day.temperature_2m_max) + value(day.temperature_2m_min)) / 2.0
}

#[inline]
fn value(sample: Option<f64>) -> f64 {
    sample.unwrap_or(0.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
