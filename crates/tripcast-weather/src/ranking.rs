//! Ranking envelope and the place-name-to-ranking pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use tripcast_core::WeatherConfig;

use crate::geocode::GeocodeClient;
use crate::provider::ForecastProvider;
use crate::scoring::{score_activities_from_forecast, ActivityScore};
use crate::types::WeatherError;

/// Activity scores for one place at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesRanking {
    pub city_name: String,
    pub generated_at: DateTime<Utc>,
    pub activity_scores: Vec<ActivityScore>,
}

impl ActivitiesRanking {
    /// Wrap scores for `city_name`, stamped now
    pub fn new(city_name: impl Into<String>, scores: [ActivityScore; 4]) -> Self {
        Self {
            city_name: city_name.into(),
            generated_at: Utc::now(),
            activity_scores: scores.into(),
        }
    }

    /// Highest-scoring entry. Ties go to the earlier activity.
    pub fn best(&self) -> Option<&ActivityScore> {
        self.activity_scores
            .iter()
            .fold(None, |best: Option<&ActivityScore>, s| match best {
                Some(b) if b.score >= s.score => Some(b),
                _ => Some(s),
            })
    }
}

/// Resolves a place, fetches its forecast and scores it.
#[derive(Debug, Clone)]
pub struct ActivityRanker {
    geocoder: GeocodeClient,
    provider: ForecastProvider,
    language: String,
}

impl ActivityRanker {
    pub fn new(geocoder: GeocodeClient, provider: ForecastProvider, language: impl Into<String>) -> Self {
        Self {
            geocoder,
            provider,
            language: language.into(),
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::new(
            GeocodeClient::new(config)?,
            ForecastProvider::new(config)?,
            config.language.clone(),
        ))
    }

    /// Rank activities for the best match of `city_name`.
    ///
    /// Fails with `PlaceNotFound` when geocoding yields nothing and with
    /// `ForecastUnavailable` for any forecast failure; a forecast that did not
    /// load is never scored.
    #[instrument(skip(self), level = "info")]
    pub async fn rank(
        &self,
        city_name: &str,
        timezone: &str,
        forecast_days: u8,
    ) -> Result<ActivitiesRanking, WeatherError> {
        let city = self
            .geocoder
            .search(city_name, 1, &self.language)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::PlaceNotFound(city_name.to_string()))?;

        tracing::debug!(
            "Resolved {:?} to {} ({}, {})",
            city_name,
            city.display_name(),
            city.latitude,
            city.longitude
        );

        let forecast = self
            .provider
            .fetch(city.latitude, city.longitude, timezone, forecast_days)
            .await
            .map_err(|e| match e {
                WeatherError::ForecastUnavailable(_) => e,
                other => WeatherError::ForecastUnavailable(other.to_string()),
            })?;

        let ranking = ActivitiesRanking::new(city.name, score_activities_from_forecast(&forecast));
        for s in &ranking.activity_scores {
            tracing::debug!("{}: {}", s.activity, s.score);
        }
        Ok(ranking)
    }
}
