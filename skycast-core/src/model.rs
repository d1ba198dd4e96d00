use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A place the user asked for, optionally resolved to coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub name: String,
    pub resolved_display_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PlaceQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), resolved_display_name: None, latitude: None, longitude: None }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Resolved name if geocoding ran, otherwise what the user typed.
    pub fn display_name(&self) -> &str {
        self.resolved_display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Celsius,
    Fahrenheit,
}

impl UnitPreference {
    /// Value of the provider's `temperature_unit` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "celsius",
            UnitPreference::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitPreference::Celsius => "°C",
            UnitPreference::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [UnitPreference] {
        &[UnitPreference::Celsius, UnitPreference::Fahrenheit]
    }
}

impl fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "celsius" | "c" => Ok(UnitPreference::Celsius),
            "fahrenheit" | "f" => Ok(UnitPreference::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Everything the forecast and air-quality requests need.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub unit: UnitPreference,
    pub timezone: String,
    /// Days wanted on screen; the provider is asked for one more.
    pub forecast_days: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Pollutant {
    Pm10,
    Pm2_5,
    Co,
    No2,
    So2,
    O3,
}

impl Pollutant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Pm10 => "pm10",
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Co => "co",
            Pollutant::No2 => "no2",
            Pollutant::So2 => "so2",
            Pollutant::O3 => "o3",
        }
    }

    pub const fn all() -> &'static [Pollutant] {
        &[
            Pollutant::Pm10,
            Pollutant::Pm2_5,
            Pollutant::Co,
            Pollutant::No2,
            Pollutant::So2,
            Pollutant::O3,
        ]
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pollutant concentrations at one instant. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQuality(BTreeMap<Pollutant, f64>);

impl AirQuality {
    /// Keeps the non-null readings; `None` if nothing is left.
    pub fn from_readings<I>(readings: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Pollutant, Option<f64>)>,
    {
        let map: BTreeMap<_, _> =
            readings.into_iter().filter_map(|(p, v)| v.map(|v| (p, v))).collect();

        if map.is_empty() { None } else { Some(Self(map)) }
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<f64> {
        self.0.get(&pollutant).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    /// mm over the preceding hour.
    pub precipitation: Option<f64>,
    /// km/h.
    pub wind_speed: Option<f64>,
    pub uv_index: Option<f64>,
    pub weather_code: Option<i32>,
    pub description: &'static str,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub weather_code: Option<i32>,
    pub description: &'static str,
    pub precipitation_probability: Option<f64>,
}

/// One normalized weather result. Built once per load and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
    pub air_quality: Option<AirQuality>,
}
