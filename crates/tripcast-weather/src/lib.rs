//! Weather-driven activity ranking for tripcast.
//!
//! Resolves place names and fetches forecasts from Open-Meteo, then reduces a
//! forecast to a small feature vector and scores four fixed activities.

pub mod types;
pub mod geocode;
pub mod provider;
pub mod ranking;
pub mod retry;
pub mod scoring;
pub mod summary;

pub use types::*;
pub use geocode::GeocodeClient;
pub use provider::ForecastProvider;
pub use ranking::{ActivitiesRanking, ActivityRanker};
pub use scoring::{score, score_activities_from_forecast, Activity, ActivityScore};
pub use summary::{summarize, FeatureVector};
