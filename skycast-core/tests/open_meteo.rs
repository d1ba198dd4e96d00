//! Provider and controller behaviour against a mock Open-Meteo server.

use skycast_core::{
    AppConfig, Controller, Endpoints, ErrorKind, LoadState, Outcome, Pollutant, TileKind,
    UnitPreference, WeatherError, WeatherProvider, WeatherRequest, normalize,
    provider::open_meteo::OpenMeteoProvider, provider_from_config,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn geocoding_body(admin1: Option<&str>) -> serde_json::Value {
    let mut place = serde_json::json!({
        "id": 4250542,
        "name": "Springfield",
        "latitude": 39.80172,
        "longitude": -89.64371,
        "elevation": 183.0,
        "country_code": "US",
        "country": "United States",
        "timezone": "America/Chicago"
    });
    if let Some(admin1) = admin1 {
        place["admin1"] = serde_json::json!(admin1);
    }
    serde_json::json!({ "results": [place], "generationtime_ms": 0.7 })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 39.8,
        "longitude": -89.64,
        "timezone": "America/Chicago",
        "current": {
            "time": "2024-06-03T14:15",
            "interval": 900,
            "temperature_2m": 26.3,
            "relative_humidity_2m": 58,
            "apparent_temperature": 27.1,
            "is_day": 1,
            "precipitation": 0.0,
            "weather_code": 2,
            "wind_speed_10m": 11.2
        },
        "hourly": {
            "time": ["2024-06-03T13:00", "2024-06-03T14:00", "2024-06-03T15:00"],
            "uv_index": [6.1, 6.8, 5.9]
        },
        "daily": {
            "time": [
                "2024-06-03", "2024-06-04", "2024-06-05", "2024-06-06",
                "2024-06-07", "2024-06-08", "2024-06-09", "2024-06-10"
            ],
            "weather_code": [2, 61, 95, 3, 0, 1, 80, 45],
            "temperature_2m_max": [28.0, 24.5, 22.1, 25.0, 27.3, 29.9, 26.4, 23.0],
            "temperature_2m_min": [16.2, 15.0, 14.8, 13.9, 15.5, 17.0, 16.1, 14.0],
            "sunrise": ["2024-06-03T05:31", "2024-06-04T05:31"],
            "sunset": ["2024-06-03T20:24", "2024-06-04T20:25"],
            "precipitation_probability_max": [10, 70, 85, 20, 0, 5, 40, 15]
        }
    })
}

fn air_quality_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 39.8,
        "longitude": -89.6,
        "hourly": {
            "time": ["2024-06-03T13:00", "2024-06-03T14:00", "2024-06-03T15:00"],
            "pm10": [null, null, null],
            "pm2_5": [8.0, 9.4, 10.1],
            "carbon_monoxide": [null, 180.0, null],
            "nitrogen_dioxide": [null, null, null],
            "sulphur_dioxide": [null, null, null],
            "ozone": [null, null, null]
        }
    })
}

fn provider(server: &MockServer) -> OpenMeteoProvider {
    #[allow(clippy::expect_used)]
    OpenMeteoProvider::new(Endpoints::with_base(&server.uri())).expect("client builds")
}

fn request(unit: UnitPreference) -> WeatherRequest {
    WeatherRequest {
        latitude: 39.8,
        longitude: -89.6,
        unit,
        timezone: "auto".to_string(),
        forecast_days: 7,
    }
}

async fn mount_weather(server: &MockServer) {
    mount_geocoding(server, ResponseTemplate::new(200).set_body_json(geocoding_body(Some("Illinois"))))
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .mount(server)
        .await;
}

async fn mount_geocoding(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

fn controller(server: &MockServer) -> Controller {
    let config = AppConfig {
        default_place: "Springfield".to_string(),
        endpoints: Endpoints::with_base(&server.uri()),
        ..Default::default()
    };
    #[allow(clippy::expect_used)]
    let provider = provider_from_config(&config).expect("provider builds");
    Controller::new(provider, config)
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn resolve_place_joins_all_parts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Springfield"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_body(Some("Illinois"))))
        .expect(1)
        .mount(&server)
        .await;

    let place = provider(&server).resolve_place("Springfield").await.unwrap();

    assert_eq!(place.name, "Springfield");
    assert_eq!(
        place.resolved_display_name.as_deref(),
        Some("Springfield, Illinois, United States")
    );
    assert_eq!(place.coordinates(), Some((39.80172, -89.64371)));
}

#[tokio::test]
async fn resolve_place_without_region() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(geocoding_body(None))).await;

    let place = provider(&server).resolve_place("Springfield").await.unwrap();
    assert_eq!(place.resolved_display_name.as_deref(), Some("Springfield, United States"));
}

#[tokio::test]
async fn resolve_place_zero_results_is_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.3 })),
    )
    .await;

    let result = provider(&server).resolve_place("Qwxzzy").await;
    assert!(
        matches!(&result, Err(WeatherError::NotFound { place }) if place == "Qwxzzy"),
        "Expected NotFound, got: {result:?}"
    );
}

#[tokio::test]
async fn resolve_place_server_error_is_not_found() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .await;

    let err = provider(&server).resolve_place("Springfield").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// Forecast and air quality
// ============================================================================

#[tokio::test]
async fn fetch_weather_sends_explicit_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "39.8"))
        .and(query_param("longitude", "-89.6"))
        .and(query_param("timezone", "auto"))
        .and(query_param("forecast_days", "8"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .and(query_param("timezone", "auto"))
        .and(query_param(
            "hourly",
            "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .expect(1)
        .mount(&server)
        .await;

    let (forecast, air_quality) =
        provider(&server).fetch_weather(&request(UnitPreference::Fahrenheit)).await.unwrap();

    let requests = server.received_requests().await.unwrap_or_default();
    let forecast_url = requests[0].url.to_string();
    assert!(forecast_url.contains("uv_index"));
    assert!(!forecast_url.contains('*'));

    let snapshot = normalize(&forecast, &air_quality, 7).unwrap();
    assert_eq!(snapshot.daily.len(), 7);
    assert_eq!(snapshot.current.uv_index, Some(6.8));
    assert_eq!(snapshot.current.description, "Partly cloudy");

    let aq = snapshot.air_quality.unwrap();
    assert_eq!(aq.get(Pollutant::Pm2_5), Some(9.4));
    assert_eq!(aq.get(Pollutant::Co), Some(180.0));
    assert_eq!(aq.len(), 2);
}

#[tokio::test]
async fn forecast_failure_skips_air_quality() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server).fetch_weather(&request(UnitPreference::Celsius)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn malformed_air_quality_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&server)
        .await;

    let result = provider(&server).fetch_weather(&request(UnitPreference::Celsius)).await;
    assert!(matches!(result, Err(WeatherError::Fetch(_))), "Expected Fetch, got: {result:?}");
}

// ============================================================================
// Controller end to end
// ============================================================================

#[tokio::test]
async fn controller_renders_loaded_weather() {
    let server = MockServer::start().await;
    mount_weather(&server).await;

    let mut controller = controller(&server);
    assert!(controller.start());
    assert!(controller.run_pending_load().await);

    assert_eq!(controller.state(), LoadState::Idle(Outcome::Success));
    let display = controller.display();
    assert_eq!(display.location, "Springfield");
    assert_eq!(display.status, "Showing weather for Springfield, Illinois, United States");
    assert_eq!(display.temperature, "26°C");
    assert_eq!(display.daily.len(), 7);
    assert_eq!(display.daily[0].day, "Mon");
    assert_eq!(display.tile(TileKind::UvIndex), Some("6.8"));
    assert_eq!(display.tile(TileKind::AirQuality), Some("9.4 µg/m³"));
    assert_eq!(display.tile(TileKind::Sunrise), Some("05:31 AM"));
    assert_eq!(display.tile(TileKind::Sunset), Some("08:24 PM"));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn configured_forecast_days_drops_the_spare_day() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(geocoding_body(Some("Illinois"))))
        .await;

    // Three configured days: the provider is asked for four and sends four rows.
    let mut body = forecast_body();
    for column in body["daily"].as_object_mut().into_iter().flat_map(|daily| daily.values_mut()) {
        if let Some(values) = column.as_array_mut() {
            values.truncate(4);
        }
    }
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("forecast_days", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/air-quality"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body()))
        .mount(&server)
        .await;

    let config = AppConfig {
        default_place: "Springfield".to_string(),
        forecast_days: 3,
        endpoints: Endpoints::with_base(&server.uri()),
        ..Default::default()
    };
    let provider = provider_from_config(&config).unwrap();
    let mut controller = Controller::new(provider, config);
    assert!(controller.start());
    assert!(controller.run_pending_load().await);

    assert_eq!(controller.state(), LoadState::Idle(Outcome::Success));
    let display = controller.display();
    assert_eq!(display.daily.len(), 3, "configured 3 days");
    assert_eq!(display.daily[2].day, "Wed");
    assert_eq!(controller.snapshot().map(|(_, s)| s.daily.len()), Some(3));
}

#[tokio::test]
async fn same_unit_toggle_sends_no_requests() {
    let server = MockServer::start().await;
    mount_weather(&server).await;

    let mut controller = controller(&server);
    controller.start();
    controller.run_pending_load().await;
    let before = request_count(&server).await;

    assert!(!controller.select_unit(UnitPreference::Celsius));
    assert!(!controller.run_pending_load().await);
    assert_eq!(request_count(&server).await, before);
}

#[tokio::test]
async fn fetch_failure_leaves_placeholders() {
    let server = MockServer::start().await;
    mount_geocoding(&server, ResponseTemplate::new(200).set_body_json(geocoding_body(Some("Illinois"))))
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let mut controller = controller(&server);
    controller.start();
    controller.run_pending_load().await;

    assert_eq!(controller.state(), LoadState::Idle(Outcome::Failure(ErrorKind::Fetch)));
    let display = controller.display();
    for tile in &display.tiles {
        assert_eq!(tile.value, tile.kind.placeholder(), "{} tile", tile.kind);
    }
    assert!(display.daily.is_empty());
    assert!(display.controls_enabled);
}
