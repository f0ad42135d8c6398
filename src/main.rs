//! tripcast - what to do where, and when.
//!
//! ```bash
//! # Rank activities for a city over the next 3 days
//! tripcast rank "Chamonix"
//!
//! # Same ranking as JSON
//! tripcast rank "Biarritz" --json
//!
//! # Look up candidate places
//! tripcast suggest "Spring" --limit 5
//!
//! # Raw normalized forecast for coordinates
//! tripcast forecast --latitude 45.92 --longitude 6.87 --days 3
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tripcast_core::{Config, ConfigError};
use tripcast_weather::{
    ActivitiesRanking, ActivityRanker, CitySuggestion, ForecastProvider, GeocodeClient,
    WeatherError,
};

#[derive(Parser)]
#[command(
    name = "tripcast",
    version,
    about = "Rank activities for a place from its weather forecast"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Score Skiing, Surfing and sightseeing for a place
    Rank {
        /// Place name to resolve
        city: String,

        /// Forecast timezone ("auto" resolves from coordinates)
        #[arg(long)]
        timezone: Option<String>,

        /// Forecast days to request (clamped to 1-16)
        #[arg(long)]
        days: Option<u8>,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },
    /// List places matching a name
    Suggest {
        name: String,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        language: Option<String>,
    },
    /// Print the normalized forecast for coordinates as JSON
    Forecast {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,

        #[arg(long)]
        timezone: Option<String>,

        #[arg(long)]
        days: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let (config, validation) = Config::load_validated(cli.config.as_deref())?;
    let level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    tripcast_core::init(level)?;
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let weather = &config.weather;
    match cli.command {
        Command::Rank {
            city,
            timezone,
            days,
            json,
        } => {
            let ranker = ActivityRanker::from_config(weather)?;
            let ranking = ranker
                .rank(
                    &city,
                    timezone.as_deref().unwrap_or(&weather.default_timezone),
                    days.unwrap_or(weather.forecast_days),
                )
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&ranking)?);
            } else {
                print_ranking(&ranking);
            }
        }
        Command::Suggest {
            name,
            limit,
            language,
        } => {
            let client = GeocodeClient::new(weather)?;
            let suggestions = client
                .search(
                    &name,
                    limit.unwrap_or(weather.suggestion_limit),
                    language.as_deref().unwrap_or(&weather.language),
                )
                .await?;
            print_suggestions(&suggestions);
        }
        Command::Forecast {
            latitude,
            longitude,
            timezone,
            days,
        } => {
            let provider = ForecastProvider::new(weather)?;
            let forecast = provider
                .fetch(
                    latitude,
                    longitude,
                    timezone.as_deref().unwrap_or(&weather.default_timezone),
                    days.unwrap_or(weather.forecast_days),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&forecast)?);
        }
    }

    Ok(())
}

fn print_ranking(ranking: &ActivitiesRanking) {
    println!(
        "{} (generated {})",
        ranking.city_name,
        ranking.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    for s in &ranking.activity_scores {
        println!(
            "  {:<20} {:>5.1}  {}",
            s.activity.name(),
            s.score,
            s.reasons.join(", ")
        );
    }
    if let Some(best) = ranking.best() {
        println!("Best bet: {}", best.activity);
    }
}

fn print_suggestions(suggestions: &[CitySuggestion]) {
    if suggestions.is_empty() {
        println!("No matching places.");
        return;
    }
    for s in suggestions {
        println!(
            "{:<40} {:>9.4} {:>10.4}  {}",
            s.display_name(),
            s.latitude,
            s.longitude,
            s.timezone.as_deref().unwrap_or("-")
        );
    }
}

fn user_message(error: &anyhow::Error) -> String {
    if let Some(e) = error.downcast_ref::<WeatherError>() {
        return match e {
            WeatherError::PlaceNotFound(name) => format!("No place found for \"{}\".", name),
            other => other.user_message().to_string(),
        };
    }
    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return format!("{} ({})", e.user_message(), e);
    }
    error.to_string()
}
