//! Tests for the WeatherAPI gateway using a mock HTTP server.

use std::path::PathBuf;

use httpmock::Method::GET;
use httpmock::MockServer;
use meteo_bot::weather::ConditionKind;
use meteo_bot::weather::WeatherGateway;
use meteo_bot::weather::weatherapi::WeatherApiGateway;

/// Loads a test response file from the responses directory.
fn get_response(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/responses");
    path.push(filename);
    std::fs::read_to_string(path).expect("Failed to read response file")
}

#[tokio::test]
async fn test_forecast_parses_hours() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/forecast.json")
            .query_param("key", "test-key")
            .query_param("q", "55.04,82.93")
            .query_param("days", "1")
            .query_param("aqi", "no");
        then.status(200)
            .header("content-type", "application/json")
            .body(get_response("weatherapi_forecast.json"));
    });

    let forecast = gateway
        .forecast(55.04, 82.93)
        .await
        .expect("Failed to fetch forecast")
        .expect("Forecast should be present");

    mock.assert();
    assert_eq!(forecast.hourly.len(), 3);

    let morning = &forecast.hourly[0];
    assert_eq!(morning.time.format("%H:%M").to_string(), "09:00");
    assert_eq!(morning.temp_c, 15.5);
    assert_eq!(morning.condition, ConditionKind::Clear);
    assert!(!morning.will_rain);
    assert!((morning.wind_speed_ms - 3.0).abs() < 1e-9); // 10.8 km/h

    let afternoon = &forecast.hourly[1];
    assert_eq!(afternoon.rain_chance_pct, 80);
    assert!(afternoon.will_rain);
    assert_eq!(afternoon.condition, ConditionKind::Drizzle);
}

#[tokio::test]
async fn test_uv_index_rounds_reading() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/forecast.json")
            .query_param("q", "Novosibirsk");
        then.status(200)
            .header("content-type", "application/json")
            .body(get_response("weatherapi_forecast.json"));
    });

    let uv = gateway
        .uv_index("Novosibirsk")
        .await
        .expect("Failed to fetch UV index");

    mock.assert();
    assert_eq!(uv, Some(7));
}

#[tokio::test]
async fn test_air_quality_reads_pm25() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/forecast.json")
            .query_param("q", "Novosibirsk")
            .query_param("aqi", "yes");
        then.status(200)
            .header("content-type", "application/json")
            .body(get_response("weatherapi_forecast.json"));
    });

    let air = gateway
        .air_quality("Novosibirsk")
        .await
        .expect("Failed to fetch air quality")
        .expect("Air quality should be present");

    mock.assert();
    assert_eq!(air.pm2_5, 40.2);
    assert!((101..=150).contains(&air.estimated_aqi()));
}

#[tokio::test]
async fn test_severe_alerts_parsed() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/forecast.json")
            .query_param("q", "New Orleans")
            .query_param("alerts", "yes");
        then.status(200)
            .header("content-type", "application/json")
            .body(get_response("weatherapi_alerts.json"));
    });

    let alerts = gateway
        .severe_alerts("New Orleans")
        .await
        .expect("Failed to fetch alerts");

    mock.assert();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].event_name, "Hurricane Warning");
    assert!(alerts[0].description.contains("hurricane-force winds"));
}

#[tokio::test]
async fn test_error_status_reads_as_unavailable() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    server.mock(|when, then| {
        when.method(GET).path("/forecast.json");
        then.status(403).body("{\"error\":{\"message\":\"key invalid\"}}");
    });

    let forecast = gateway
        .forecast(55.04, 82.93)
        .await
        .expect("HTTP-level errors degrade to None");
    assert!(forecast.is_none());

    let uv = gateway.uv_index("Novosibirsk").await.unwrap();
    assert!(uv.is_none());

    let alerts = gateway.severe_alerts("Novosibirsk").await.unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_no_alerts_block_reads_as_empty() {
    let server = MockServer::start();
    let gateway = WeatherApiGateway::new(server.url(""), "test-key");

    server.mock(|when, then| {
        when.method(GET).path("/forecast.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(get_response("weatherapi_forecast.json"));
    });

    let alerts = gateway.severe_alerts("Novosibirsk").await.unwrap();
    assert!(alerts.is_empty());
}
