use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    config::Endpoints,
    error::WeatherError,
    model::{PlaceQuery, WeatherRequest},
    raw::{RawAirQuality, RawForecast, RawGeocoding, RawPlace},
};

use super::WeatherProvider;

const CURRENT_FIELDS: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "is_day",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "pressure_msl",
    "surface_pressure",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];

const HOURLY_FIELDS: &[&str] = &[
    "temperature_2m",
    "apparent_temperature",
    "precipitation_probability",
    "precipitation",
    "rain",
    "showers",
    "snowfall",
    "weather_code",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "uv_index",
];

const DAILY_FIELDS: &[&str] = &[
    "weather_code",
    "temperature_2m_max",
    "temperature_2m_min",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "sunrise",
    "sunset",
    "uv_index_max",
    "precipitation_sum",
    "precipitation_hours",
    "precipitation_probability_max",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
];

const POLLUTANT_FIELDS: &[&str] = &[
    "pm10",
    "pm2_5",
    "carbon_monoxide",
    "nitrogen_dioxide",
    "sulphur_dioxide",
    "ozone",
];

/// Open-Meteo geocoding, forecast and air-quality APIs. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    endpoints: Endpoints,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(endpoints: Endpoints) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { endpoints, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        debug!(url, what, "sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request to Open-Meteo"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read Open-Meteo {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse Open-Meteo {what} JSON"))
    }

    async fn geocode(&self, name: &str) -> Result<RawPlace> {
        let query = [
            ("name", name.to_string()),
            ("count", "1".to_string()),
            ("language", "en".to_string()),
            ("format", "json".to_string()),
        ];

        let parsed: RawGeocoding =
            self.get_json(&self.endpoints.geocoding, &query, "geocoding").await?;

        parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Geocoding returned no results for '{name}'"))
    }

    async fn fetch_forecast(&self, request: &WeatherRequest) -> Result<RawForecast> {
        let mut query = coordinates_query(request);
        query.extend([
            ("current", CURRENT_FIELDS.join(",")),
            ("hourly", HOURLY_FIELDS.join(",")),
            ("daily", DAILY_FIELDS.join(",")),
            ("temperature_unit", request.unit.as_str().to_string()),
            // One spare day so a full week survives truncation.
            ("forecast_days", (u16::from(request.forecast_days) + 1).to_string()),
        ]);

        self.get_json(&self.endpoints.forecast, &query, "forecast").await
    }

    async fn fetch_air_quality(&self, request: &WeatherRequest) -> Result<RawAirQuality> {
        let mut query = coordinates_query(request);
        query.push(("hourly", POLLUTANT_FIELDS.join(",")));

        self.get_json(&self.endpoints.air_quality, &query, "air quality").await
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn resolve_place(&self, name: &str) -> Result<PlaceQuery, WeatherError> {
        match self.geocode(name).await {
            Ok(place) => {
                let resolved_display_name = display_name(&place);
                debug!(name, resolved = %resolved_display_name, "place resolved");
                Ok(PlaceQuery {
                    name: name.to_string(),
                    resolved_display_name: Some(resolved_display_name),
                    latitude: Some(place.latitude),
                    longitude: Some(place.longitude),
                })
            }
            Err(e) => {
                warn!(name, error = %format!("{e:#}"), "place lookup failed");
                Err(WeatherError::NotFound { place: name.to_string() })
            }
        }
    }

    async fn fetch_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<(RawForecast, RawAirQuality), WeatherError> {
        // Sequential on purpose: no air-quality request once the forecast failed.
        let forecast = self.fetch_forecast(request).await.map_err(|e| {
            warn!(error = %format!("{e:#}"), "forecast request failed");
            WeatherError::fetch(e)
        })?;

        let air_quality = self.fetch_air_quality(request).await.map_err(|e| {
            warn!(error = %format!("{e:#}"), "air quality request failed");
            WeatherError::fetch(e)
        })?;

        Ok((forecast, air_quality))
    }
}

fn coordinates_query(request: &WeatherRequest) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", request.latitude.to_string()),
        ("longitude", request.longitude.to_string()),
        ("timezone", request.timezone.clone()),
    ]
}

/// "Locality, Region, Country", skipping whatever the geocoder left out.
pub(crate) fn display_name(place: &RawPlace) -> String {
    [Some(place.name.as_str()), place.admin1.as_deref(), place.country.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(admin1: Option<&str>, country: Option<&str>) -> RawPlace {
        RawPlace {
            name: "Springfield".into(),
            latitude: 39.8,
            longitude: -89.6,
            admin1: admin1.map(String::from),
            country: country.map(String::from),
        }
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(
            display_name(&place(Some("Illinois"), Some("United States"))),
            "Springfield, Illinois, United States"
        );
        assert_eq!(display_name(&place(None, Some("United States"))), "Springfield, United States");
        assert_eq!(display_name(&place(Some("Illinois"), None)), "Springfield, Illinois");
        assert_eq!(display_name(&place(None, None)), "Springfield");
    }

    #[test]
    fn forecast_fields_are_explicit() {
        assert!(CURRENT_FIELDS.iter().chain(HOURLY_FIELDS).chain(DAILY_FIELDS).all(|f| *f != "*"));
        assert!(HOURLY_FIELDS.contains(&"uv_index"));
        assert!(DAILY_FIELDS.contains(&"sunrise"));
        assert_eq!(POLLUTANT_FIELDS.join(","), "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let short = "not found";
        assert_eq!(truncate_body(short), short);

        let long = "é".repeat(250);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
