use crate::{
    AppConfig, PlaceQuery, UnitPreference, WeatherError, WeatherRequest, WeatherSnapshot,
    normalize::normalize,
    provider::open_meteo::OpenMeteoProvider,
    raw::{RawAirQuality, RawForecast},
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::info;

pub mod open_meteo;

/// Source of geocoding, forecast and air-quality data.
///
/// Implementations reduce every failure to the two kinds the caller
/// distinguishes: geocoding failures are [`WeatherError::NotFound`], the
/// rest are [`WeatherError::Fetch`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn resolve_place(&self, name: &str) -> Result<PlaceQuery, WeatherError>;

    async fn fetch_weather(
        &self,
        request: &WeatherRequest,
    ) -> Result<(RawForecast, RawAirQuality), WeatherError>;
}

/// Construct the provider described by the config.
pub fn provider_from_config(config: &AppConfig) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::new(config.endpoints.clone())?;
    Ok(Box::new(provider))
}

/// Geocode `place`, fetch its weather and normalize it.
pub async fn load_snapshot(
    provider: &dyn WeatherProvider,
    place: &str,
    unit: UnitPreference,
    config: &AppConfig,
) -> Result<(PlaceQuery, WeatherSnapshot), WeatherError> {
    let resolved = provider.resolve_place(place).await?;
    let (latitude, longitude) = resolved.coordinates().ok_or_else(|| {
        WeatherError::Unexpected(format!("geocoder returned no coordinates for '{place}'"))
    })?;

    let request = WeatherRequest {
        latitude,
        longitude,
        unit,
        timezone: config.timezone.clone(),
        forecast_days: config.forecast_days(),
    };

    let (forecast, air_quality) = provider.fetch_weather(&request).await?;
    let snapshot = normalize(&forecast, &air_quality, request.forecast_days)?;

    info!(place = resolved.display_name(), %unit, "weather loaded");
    Ok((resolved, snapshot))
}
