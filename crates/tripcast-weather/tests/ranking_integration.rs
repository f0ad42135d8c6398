//! End-to-end ranking tests against a mock Open-Meteo server.

use tripcast_core::WeatherConfig;
use tripcast_weather::{Activity, ActivityRanker, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ranker_for(server: &MockServer) -> ActivityRanker {
    let config = WeatherConfig {
        geocoding_api_url: format!("{}/v1/search", server.uri()),
        forecast_api_url: format!("{}/v1/forecast", server.uri()),
        max_retries: 0,
        ..WeatherConfig::default()
    };
    ActivityRanker::from_config(&config).unwrap()
}

async fn mount_city(server: &MockServer, name: &str, latitude: f64, longitude: f64) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", name))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "id": 3413829,
                "name": name,
                "country": "Iceland",
                "latitude": latitude,
                "longitude": longitude,
                "timezone": "Atlantic/Reykjavik"
            }]
        })))
        .mount(server)
        .await;
}

/// Three daily rows and 72 identical hourly rows in Open-Meteo's columnar form
fn forecast_body(
    temps: [(f64, f64); 3],
    precip: [f64; 3],
    snow: [f64; 3],
    wind: f64,
    cloud: f64,
    hourly_precip: f64,
) -> serde_json::Value {
    let hours: Vec<String> = (0..72)
        .map(|h| format!("2026-01-{:02}T{:02}:00", 1 + h / 24, h % 24))
        .collect();
    serde_json::json!({
        "latitude": 64.1,
        "longitude": -21.9,
        "timezone": "Atlantic/Reykjavik",
        "hourly": {
            "time": hours,
            "temperature_2m": vec![0.0; 72],
            "precipitation": vec![hourly_precip; 72],
            "wind_speed_10m": vec![wind; 72],
            "cloudcover": vec![cloud; 72],
            "snowfall": vec![0.0; 72]
        },
        "daily": {
            "time": ["2026-01-01", "2026-01-02", "2026-01-03"],
            "temperature_2m_max": temps.iter().map(|t| t.0).collect::<Vec<_>>(),
            "temperature_2m_min": temps.iter().map(|t| t.1).collect::<Vec<_>>(),
            "precipitation_sum": precip,
            "snowfall_sum": snow,
            "sunrise": [null, null, null],
            "sunset": [null, null, null]
        }
    })
}

#[tokio::test]
async fn test_rank_snowy_city() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Reykjavik", 64.1, -21.9).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "64.1"))
        .and(query_param("longitude", "-21.9"))
        .and(query_param("forecast_days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(
            [(-5.0, -10.0), (-6.0, -11.0), (-7.0, -12.0)],
            [0.0; 3],
            [20.0, 10.0, 5.0],
            5.0,
            50.0,
            0.0,
        )))
        .mount(&mock_server)
        .await;

    let ranking = ranker_for(&mock_server)
        .rank("Reykjavik", "auto", 7)
        .await
        .unwrap();

    assert_eq!(ranking.city_name, "Reykjavik");
    let order: Vec<Activity> = ranking.activity_scores.iter().map(|s| s.activity).collect();
    assert_eq!(order, Activity::ALL.to_vec());

    let skiing = &ranking.activity_scores[0];
    assert_eq!(skiing.score, 100.0);
    assert_eq!(
        skiing.reasons,
        vec!["avgTemp=-8.5°C", "totalSnow=35.0mm", "avgPrecipHourly=0.00mm"]
    );
    assert_eq!(ranking.best().map(|s| s.activity), Some(Activity::Skiing));
}

#[tokio::test]
async fn test_rank_rainy_heatwave_prefers_indoors() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Reykjavik", 64.1, -21.9).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(
            [(35.0, 30.0), (36.0, 31.0), (37.0, 32.0)],
            [50.0, 60.0, 70.0],
            [0.0; 3],
            15.0,
            90.0,
            2.0,
        )))
        .mount(&mock_server)
        .await;

    let ranking = ranker_for(&mock_server)
        .rank("Reykjavik", "auto", 3)
        .await
        .unwrap();

    let indoor = ranking
        .activity_scores
        .iter()
        .find(|s| s.activity == Activity::IndoorSightseeing)
        .unwrap();
    assert!(indoor.score > 70.0);
}

#[tokio::test]
async fn test_rank_unknown_city_is_place_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = ranker_for(&mock_server)
        .rank("Atlantis", "auto", 7)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::PlaceNotFound(ref name) if name == "Atlantis"));
    assert_eq!(err.to_string(), "City with name Atlantis not found");
}

#[tokio::test]
async fn test_rank_forecast_failure_is_forecast_unavailable() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Reykjavik", 64.1, -21.9).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = ranker_for(&mock_server)
        .rank("Reykjavik", "auto", 7)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::ForecastUnavailable(_)));
}

#[tokio::test]
async fn test_rank_malformed_forecast_is_forecast_unavailable() {
    let mock_server = MockServer::start().await;
    mount_city(&mock_server, "Reykjavik", 64.1, -21.9).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "latitude": 64.1 })),
        )
        .mount(&mock_server)
        .await;

    let err = ranker_for(&mock_server)
        .rank("Reykjavik", "auto", 7)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::ForecastUnavailable(_)));
}

#[tokio::test]
async fn test_rank_geocoding_outage_is_not_place_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let err = ranker_for(&mock_server)
        .rank("Reykjavik", "auto", 7)
        .await
        .unwrap_err();
    assert!(matches!(err, WeatherError::GeocodingUnavailable(_)));
}
