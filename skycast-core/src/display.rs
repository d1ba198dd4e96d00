//! Display regions and how a snapshot, or its absence, fills them.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::ErrorKind;
use crate::model::{DailyForecast, PlaceQuery, Pollutant, UnitPreference, WeatherSnapshot};
use crate::normalize::MAX_DAILY;

pub const PLACEHOLDER: &str = "--";

/// The eight metric tiles under the forecast strip, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    RainRate,
    Humidity,
    FeelsLike,
    UvIndex,
    AirQuality,
    Sunrise,
    Sunset,
    WindSpeed,
}

impl TileKind {
    pub const ALL: [TileKind; 8] = [
        TileKind::RainRate,
        TileKind::Humidity,
        TileKind::FeelsLike,
        TileKind::UvIndex,
        TileKind::AirQuality,
        TileKind::Sunrise,
        TileKind::Sunset,
        TileKind::WindSpeed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TileKind::RainRate => "Rain Rate",
            TileKind::Humidity => "Humidity",
            TileKind::FeelsLike => "Feels Like",
            TileKind::UvIndex => "UV Index",
            TileKind::AirQuality => "Air Quality (PM2.5)",
            TileKind::Sunrise => "Sunrise",
            TileKind::Sunset => "Sunset",
            TileKind::WindSpeed => "Wind Speed",
        }
    }

    /// Text shown while nothing is loaded.
    pub fn placeholder(&self) -> &'static str {
        match self {
            TileKind::RainRate => "-- mm",
            TileKind::Humidity => "--%",
            TileKind::FeelsLike => "--°",
            TileKind::UvIndex | TileKind::AirQuality => PLACEHOLDER,
            TileKind::Sunrise => "--:-- AM",
            TileKind::Sunset => "--:-- PM",
            TileKind::WindSpeed => "-- km/h",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCard {
    /// Weekday abbreviation, e.g. "Mon".
    pub day: String,
    /// "max°C/min°C".
    pub temperatures: String,
    pub description: String,
    pub icon_code: Option<i32>,
}

/// Everything the window shows. Renderers draw this and nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub icon_code: Option<i32>,
    pub daily: Vec<DayCard>,
    pub tiles: Vec<Tile>,
    pub status: String,
    /// Search box, search button and unit selector.
    pub controls_enabled: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl DisplayState {
    /// Every region at its placeholder, controls enabled.
    pub fn placeholder() -> Self {
        Self {
            location: PLACEHOLDER.to_string(),
            temperature: "--°".to_string(),
            description: PLACEHOLDER.to_string(),
            icon_code: None,
            daily: Vec::new(),
            tiles: TileKind::ALL
                .iter()
                .map(|kind| Tile { kind: *kind, value: kind.placeholder().to_string() })
                .collect(),
            status: String::new(),
            controls_enabled: true,
        }
    }

    pub fn loading() -> Self {
        Self {
            location: "Loading...".to_string(),
            status: "Fetching weather data...".to_string(),
            controls_enabled: false,
            ..Self::placeholder()
        }
    }

    pub fn failure(kind: ErrorKind) -> Self {
        let mut state = Self::placeholder();
        match kind {
            ErrorKind::NotFound => {
                state.location = "Location not found.".to_string();
                state.status = "Please check location name or try another.".to_string();
            }
            ErrorKind::Fetch => {
                state.status = "Could not fetch weather data. API issue or no data.".to_string();
            }
            ErrorKind::Unexpected => {
                state.status =
                    "An unexpected error occurred while loading weather data.".to_string();
            }
        }
        state
    }

    pub fn from_snapshot(place: &PlaceQuery, snapshot: &WeatherSnapshot, unit: UnitPreference) -> Self {
        let current = &snapshot.current;
        let symbol = unit.symbol();
        let full_name = place.display_name();

        let tiles = TileKind::ALL
            .iter()
            .map(|kind| {
                let value = match kind {
                    TileKind::RainRate => current
                        .precipitation
                        .map_or_else(|| "0.0 mm".to_string(), |v| format!("{v:.1} mm")),
                    TileKind::Humidity => {
                        current.humidity.map_or_else(|| "--%".to_string(), |v| format!("{v:.0}%"))
                    }
                    TileKind::FeelsLike => current
                        .feels_like
                        .map_or_else(|| "--°".to_string(), |v| format!("{v:.0}{symbol}")),
                    TileKind::UvIndex => current
                        .uv_index
                        .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.1}")),
                    TileKind::AirQuality => snapshot
                        .air_quality
                        .as_ref()
                        .and_then(|aq| aq.get(Pollutant::Pm2_5))
                        .map_or_else(|| "N/A".to_string(), |v| format!("{v:.1} µg/m³")),
                    TileKind::Sunrise => clock(current.sunrise, "--:-- AM"),
                    TileKind::Sunset => clock(current.sunset, "--:-- PM"),
                    TileKind::WindSpeed => current
                        .wind_speed
                        .map_or_else(|| "-- km/h".to_string(), |v| format!("{v:.1} km/h")),
                };
                Tile { kind: *kind, value }
            })
            .collect();

        Self {
            location: full_name.split(',').next().unwrap_or(full_name).trim().to_string(),
            temperature: current
                .temperature
                .map_or_else(|| "--°".to_string(), |v| format!("{v:.0}{symbol}")),
            description: capitalize(current.description),
            icon_code: current.weather_code,
            daily: snapshot.daily.iter().take(MAX_DAILY).map(|d| day_card(d, symbol)).collect(),
            tiles,
            status: format!("Showing weather for {full_name}"),
            controls_enabled: true,
        }
    }

    pub fn tile(&self, kind: TileKind) -> Option<&str> {
        self.tiles.iter().find(|t| t.kind == kind).map(|t| t.value.as_str())
    }

    /// True when no region carries loaded data.
    pub fn is_placeholder(&self) -> bool {
        self.temperature == "--°"
            && self.description == PLACEHOLDER
            && self.icon_code.is_none()
            && self.daily.is_empty()
            && self.tiles.iter().all(|t| t.value == t.kind.placeholder())
    }
}

fn day_card(day: &DailyForecast, symbol: &str) -> DayCard {
    let temp = |v: Option<f64>| v.map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{v:.0}"));

    DayCard {
        day: day.date.format("%a").to_string(),
        temperatures: format!("{}{symbol}/{}{symbol}", temp(day.temp_max), temp(day.temp_min)),
        description: day.description.to_string(),
        icon_code: day.weather_code,
    }
}

fn clock(at: Option<NaiveDateTime>, missing: &str) -> String {
    at.map_or_else(|| missing.to_string(), |t| t.format("%I:%M %p").to_string())
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
