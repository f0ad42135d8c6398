use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_GEOCODING_API_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_API_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Open-Meteo accepts 1..=16 forecast days.
pub const MIN_FORECAST_DAYS: u8 = 1;
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding and forecast settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Open-Meteo geocoding search endpoint
    pub geocoding_api_url: String,

    /// Open-Meteo forecast endpoint
    pub forecast_api_url: String,

    /// Timezone passed to the forecast API ("auto" resolves from coordinates)
    pub default_timezone: String,

    /// Days of forecast to request
    pub forecast_days: u8,

    /// Language for place names
    pub language: String,

    /// Maximum number of place suggestions
    pub suggestion_limit: u32,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// Retry attempts for transient HTTP failures
    pub max_retries: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_api_url: DEFAULT_GEOCODING_API_URL.to_string(),
            forecast_api_url: DEFAULT_FORECAST_API_URL.to_string(),
            default_timezone: "auto".to_string(),
            forecast_days: 7,
            language: "en".to_string(),
            suggestion_limit: 10,
            request_timeout_secs: 10,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config.with_env_overrides());
        }

        Ok(Self::read(&config_path)?.with_env_overrides())
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
        Ok(Self::read(path)?.with_env_overrides())
    }

    /// Load configuration (default location or `path`) and validate it.
    ///
    /// Any validation error fails the load; warnings are returned so the
    /// caller can report them once logging is up.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok((config, validation))
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var("GEOCODING_API_URL").ok(),
            std::env::var("FORECAST_API_URL").ok(),
        )
    }

    /// Replace the API endpoints with explicit values, ignoring blanks.
    pub fn with_overrides(
        mut self,
        geocoding_api_url: Option<String>,
        forecast_api_url: Option<String>,
    ) -> Self {
        if let Some(url) = geocoding_api_url.filter(|u| !u.trim().is_empty()) {
            self.weather.geocoding_api_url = url;
        }
        if let Some(url) = forecast_api_url.filter(|u| !u.trim().is_empty()) {
            self.weather.forecast_api_url = url;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let weather = &self.weather;

        validate_url(
            &weather.geocoding_api_url,
            "weather.geocoding_api_url",
            &mut result,
        );
        validate_url(
            &weather.forecast_api_url,
            "weather.forecast_api_url",
            &mut result,
        );

        if weather.default_timezone.trim().is_empty() {
            result.add_error(
                "weather.default_timezone",
                "Timezone must not be empty (use \"auto\")",
            );
        }

        if weather.language.trim().is_empty() {
            result.add_error("weather.language", "Language must not be empty");
        }

        if !(MIN_FORECAST_DAYS..=MAX_FORECAST_DAYS).contains(&weather.forecast_days) {
            result.add_warning(
                "weather.forecast_days",
                format!(
                    "{} is outside {}-{} and will be clamped",
                    weather.forecast_days, MIN_FORECAST_DAYS, MAX_FORECAST_DAYS
                ),
            );
        }

        if weather.suggestion_limit == 0 {
            result.add_error(
                "weather.suggestion_limit",
                "Suggestion limit must be greater than 0",
            );
        }

        if weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if weather.max_retries > 10 {
            result.add_warning("weather.max_retries", "More than 10 retries configured");
        }

        if self.logging.level.trim().is_empty() {
            result.add_error("logging.level", "Log level must not be empty");
        }

        result
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tripcast");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }

            if url.port() == Some(0) {
                result.add_error(field_name, "Port cannot be 0");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
