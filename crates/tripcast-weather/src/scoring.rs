//! Activity scoring.
//!
//! Maps a [`FeatureVector`] to a 0-100 suitability score for each of the
//! four supported activities. Pure and deterministic: the same features always
//! produce the same scores and reasons.

use serde::{Deserialize, Serialize};

use crate::summary::{summarize, FeatureVector};
use crate::types::Forecast;

/// Supported activities. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Skiing,
    Surfing,
    #[serde(rename = "Indoor Sightseeing")]
    IndoorSightseeing,
    #[serde(rename = "Outdoor Sightseeing")]
    OutdoorSightseeing,
}

impl Activity {
    /// Output order of a ranking
    pub const ALL: [Activity; 4] = [
        Activity::Skiing,
        Activity::Surfing,
        Activity::IndoorSightseeing,
        Activity::OutdoorSightseeing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Skiing => "Skiing",
            Self::Surfing => "Surfing",
            Self::IndoorSightseeing => "Indoor Sightseeing",
            Self::OutdoorSightseeing => "Outdoor Sightseeing",
        }
    }

    /// Unrounded score. Outdoor may fall below zero.
    fn raw_score(&self, f: &FeatureVector) -> f64 {
        match self {
            Self::Skiing => skiing(f),
            Self::Surfing => surfing(f),
            Self::IndoorSightseeing => indoor_sightseeing(f, outdoor_sightseeing(f)),
            Self::OutdoorSightseeing => outdoor_sightseeing(f),
        }
    }

    /// Feature readouts explaining the score, in display order
    fn reasons(&self, f: &FeatureVector) -> Vec<String> {
        let temp = format!("avgTemp={}°C", to_fixed(f.avg_temp, 1));
        let precip = format!("totalPrecip={}mm", to_fixed(f.total_precip, 1));
        match self {
            Self::Skiing => vec![
                temp,
                format!("totalSnow={}mm", to_fixed(f.total_snow, 1)),
                format!("avgPrecipHourly={}mm", to_fixed(f.avg_precip_hourly, 2)),
            ],
            Self::Surfing => vec![
                format!("avgWind={}m/s", to_fixed(f.avg_wind, 1)),
                temp,
                precip,
            ],
            Self::OutdoorSightseeing => {
                vec![temp, precip, format!("avgCloud={}%", to_fixed(f.avg_cloud, 1))]
            }
            Self::IndoorSightseeing => vec![temp, precip],
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Suitability of one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityScore {
    pub activity: Activity,
    /// 0-100, one decimal place
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Score every activity against one feature vector.
///
/// Order is always Skiing, Surfing, Indoor Sightseeing, Outdoor Sightseeing.
pub fn score(features: &FeatureVector) -> [ActivityScore; 4] {
    Activity::ALL.map(|activity| ActivityScore {
        activity,
        score: normalize(activity.raw_score(features)),
        reasons: activity.reasons(features),
    })
}

/// Summarize a forecast and score it.
pub fn score_activities_from_forecast(forecast: &Forecast) -> [ActivityScore; 4] {
    score(&summarize(forecast))
}

// Skiing
const SNOW_THRESHOLD_MM: f64 = 0.5;
const SNOW_BASE: f64 = 50.0;
const SNOW_POINTS_PER_MM: f64 = 10.0;
const SKI_COLD_TEMP: f64 = -10.0;
const SKI_WARM_TEMP: f64 = 10.0;
const SKI_PRECIP_FACTOR: f64 = 2.0;
const SKI_MAX_PRECIP_PENALTY: f64 = 0.6;

fn skiing(f: &FeatureVector) -> f64 {
    if f.total_snow > SNOW_THRESHOLD_MM {
        return clamp(SNOW_BASE + (f.total_snow * SNOW_POINTS_PER_MM).min(100.0 - SNOW_BASE));
    }
    let base = 100.0 - lerp(f.avg_temp, SKI_COLD_TEMP, SKI_WARM_TEMP);
    base * (1.0 - (f.avg_precip_hourly * SKI_PRECIP_FACTOR).min(SKI_MAX_PRECIP_PENALTY))
}

// Surfing
const SURF_IDEAL_WIND: f64 = 8.0;
const SURF_IDEAL_TEMP: f64 = 18.0;
const SURF_PRECIP_FACTOR: f64 = 200.0;
const SURF_WIND_WEIGHT: f64 = 0.5;
const SURF_PRECIP_WEIGHT: f64 = 0.3;
const SURF_TEMP_WEIGHT: f64 = 0.2;
const SURF_WET_THRESHOLD_MM: f64 = 30.0;
const SURF_WET_MULTIPLIER: f64 = 0.6;

fn surfing(f: &FeatureVector) -> f64 {
    let wind = clamp(100.0 - (f.avg_wind - SURF_IDEAL_WIND).abs() / SURF_IDEAL_WIND * 100.0);
    let precip = clamp(100.0 - f.avg_precip_hourly * SURF_PRECIP_FACTOR);
    let temp = clamp(100.0 - (f.avg_temp - SURF_IDEAL_TEMP).abs() / SURF_IDEAL_TEMP * 100.0);

    let weighted =
        wind * SURF_WIND_WEIGHT + precip * SURF_PRECIP_WEIGHT + temp * SURF_TEMP_WEIGHT;
    if f.total_precip < SURF_WET_THRESHOLD_MM {
        weighted
    } else {
        weighted * SURF_WET_MULTIPLIER
    }
}

// Sightseeing
const COMFORT_TEMP: f64 = 19.0;
const OUTDOOR_PRECIP_SCALE_MM: f64 = 10.0;
const OUTDOOR_TEMP_WEIGHT: f64 = 0.45;
const OUTDOOR_PRECIP_WEIGHT: f64 = 0.35;
const OUTDOOR_CLOUD_WEIGHT: f64 = 0.2;

/// Not clamped: the temperature term goes negative far from 19°C.
fn outdoor_sightseeing(f: &FeatureVector) -> f64 {
    let temp = 100.0 - ((f.avg_temp - COMFORT_TEMP).abs() / COMFORT_TEMP * 100.0).max(0.0);
    let precip = clamp(100.0 - (f.total_precip / OUTDOOR_PRECIP_SCALE_MM) * 100.0);
    let cloud = clamp(100.0 - f.avg_cloud);

    temp * OUTDOOR_TEMP_WEIGHT + precip * OUTDOOR_PRECIP_WEIGHT + cloud * OUTDOOR_CLOUD_WEIGHT
}

const INDOOR_COMFORT_BAND: f64 = 8.0;
const INDOOR_OUTDOOR_WEIGHT: f64 = 0.7;
const INDOOR_PRECIP_POINTS_PER_MM: f64 = 5.0;
const INDOOR_PRECIP_WEIGHT: f64 = 0.3;
const INDOOR_EXTREME_WEIGHT: f64 = 1.5;

fn indoor_sightseeing(f: &FeatureVector, outdoor_raw: f64) -> f64 {
    let extreme_temp = ((f.avg_temp - COMFORT_TEMP).abs() - INDOOR_COMFORT_BAND).max(0.0);
    clamp(
        (100.0 - outdoor_raw) * INDOOR_OUTDOOR_WEIGHT
            + (f.total_precip * INDOOR_PRECIP_POINTS_PER_MM).min(100.0) * INDOOR_PRECIP_WEIGHT
            + extreme_temp * INDOOR_EXTREME_WEIGHT,
    )
}

/// Restrict to 0..=100
fn clamp(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Map `x0` to 0 and `x1` to 100, clamped. A degenerate range is a step at `x0`.
fn lerp(x: f64, x0: f64, x1: f64) -> f64 {
    if x0 == x1 {
        return if x <= x0 { 0.0 } else { 100.0 };
    }
    clamp((x - x0) / (x1 - x0) * 100.0)
}

/// Clamp and round to one decimal place. Non-finite input scores 0.
fn normalize(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    to_fixed(clamp(v), 1).parse().unwrap_or(0.0)
}

/// Format with `digits` decimals, rounding the exact binary value and sending
/// exact ties away from zero (`Number.prototype.toFixed` semantics).
///
/// `format!` rounds ties to even, so 0.125 would print as "0.12" instead of "0.13".
fn to_fixed(value: f64, digits: usize) -> String {
    // Adding zero turns -0.0 into 0.0.
    let value = value + 0.0;
    if !value.is_finite() || value.abs() >= 1e9 {
        return format!("{:.*}", digits, value);
    }

    // A tie has an exact decimal expansion ending in 5 one place past `digits`,
    // which is only possible when the scaled integer is a multiple of 5^(digits+1).
    let magnitude = value.abs();
    let longer = format!("{:.*}", digits + 1, magnitude);
    if longer.ends_with('5') && longer.parse::<f64>() == Ok(magnitude) {
        if let Ok(scaled) = longer.replace('.', "").parse::<u128>() {
            if scaled % 5u128.pow(digits as u32 + 1) == 0 {
                let rounded = scaled / 10 + 1;
                let sign = if value < 0.0 { "-" } else { "" };
                if digits == 0 {
                    return format!("{}{}", sign, rounded);
                }
                let unit = 10u128.pow(digits as u32);
                return format!(
                    "{}{}.{:0width$}",
                    sign,
                    rounded / unit,
                    rounded % unit,
                    width = digits
                );
            }
        }
    }
    format!("{:.*}", digits, value)
}
