//! Reduces the forecast and air-quality responses to one [`WeatherSnapshot`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::codes::describe_opt;
use crate::error::WeatherError;
use crate::model::{
    AirQuality, CurrentConditions, DailyForecast, Pollutant, WeatherSnapshot,
};
use crate::raw::{RawAirQuality, RawAirQualityHourly, RawDaily, RawForecast};

/// Upper bound on daily entries kept in a snapshot.
pub const MAX_DAILY: usize = 7;

/// Builds a snapshot keeping at most `days` daily entries (never more than
/// [`MAX_DAILY`]). The provider is asked for one spare day, which is dropped here.
pub fn normalize(
    forecast: &RawForecast,
    air_quality: &RawAirQuality,
    days: u8,
) -> Result<WeatherSnapshot, WeatherError> {
    let t0 = parse_timestamp(&forecast.current.time)?;

    let hourly_times = parse_series(&forecast.hourly.time)?;
    let uv_index = nearest_index(&hourly_times, t0)
        .and_then(|i| forecast.hourly.uv_index.get(i).copied().flatten());

    let raw = &forecast.current;
    let current = CurrentConditions {
        temperature: raw.temperature_2m,
        feels_like: raw.apparent_temperature,
        humidity: raw.relative_humidity_2m,
        precipitation: raw.precipitation,
        wind_speed: raw.wind_speed_10m,
        uv_index,
        weather_code: raw.weather_code,
        description: describe_opt(raw.weather_code),
        sunrise: first_timestamp(&forecast.daily.sunrise)?,
        sunset: first_timestamp(&forecast.daily.sunset)?,
    };

    let daily = daily_forecasts(&forecast.daily, usize::from(days).min(MAX_DAILY))?;

    let air_quality = match &air_quality.hourly {
        Some(hourly) => air_quality_at(hourly, t0)?,
        None => None,
    };

    debug!(
        reference = %t0,
        days = daily.len(),
        pollutants = air_quality.as_ref().map_or(0, AirQuality::len),
        "normalized weather snapshot"
    );

    Ok(WeatherSnapshot { current, daily, air_quality })
}

/// Index of the timestamp closest to `reference`; the first one wins a tie.
pub fn nearest_index(times: &[NaiveDateTime], reference: NaiveDateTime) -> Option<usize> {
    times
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| (**t - reference).abs())
        .map(|(i, _)| i)
}

/// Parses a provider timestamp into local wall-clock time.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, WeatherError> {
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
        .ok_or_else(|| WeatherError::Unexpected(format!("invalid timestamp '{s}'")))
}

fn parse_date(s: &str) -> Result<NaiveDate, WeatherError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| WeatherError::Unexpected(format!("invalid date '{s}': {e}")))
}

fn parse_series(times: &[String]) -> Result<Vec<NaiveDateTime>, WeatherError> {
    times.iter().map(|t| parse_timestamp(t)).collect()
}

fn first_timestamp(series: &[String]) -> Result<Option<NaiveDateTime>, WeatherError> {
    series.first().map(|s| parse_timestamp(s)).transpose()
}

fn daily_forecasts(daily: &RawDaily, limit: usize) -> Result<Vec<DailyForecast>, WeatherError> {
    daily
        .time
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, date)| {
            let weather_code = at(&daily.weather_code, i);
            Ok(DailyForecast {
                date: parse_date(date)?,
                temp_max: at(&daily.temperature_2m_max, i),
                temp_min: at(&daily.temperature_2m_min, i),
                weather_code,
                description: describe_opt(weather_code),
                precipitation_probability: at(&daily.precipitation_probability_max, i),
            })
        })
        .collect()
}

fn air_quality_at(
    hourly: &RawAirQualityHourly,
    reference: NaiveDateTime,
) -> Result<Option<AirQuality>, WeatherError> {
    let times = parse_series(&hourly.time)?;
    let Some(i) = nearest_index(&times, reference) else {
        return Ok(None);
    };

    Ok(AirQuality::from_readings([
        (Pollutant::Pm10, at(&hourly.pm10, i)),
        (Pollutant::Pm2_5, at(&hourly.pm2_5, i)),
        (Pollutant::Co, at(&hourly.carbon_monoxide, i)),
        (Pollutant::No2, at(&hourly.nitrogen_dioxide, i)),
        (Pollutant::So2, at(&hourly.sulphur_dioxide, i)),
        (Pollutant::O3, at(&hourly.ozone, i)),
    ]))
}

// Short series read as null rather than failing the whole snapshot.
fn at<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
    series.get(i).copied().flatten()
}
