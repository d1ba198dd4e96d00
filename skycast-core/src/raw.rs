//! Response bodies as Open-Meteo sends them.
//!
//! Series are column-oriented: every vector in a block shares the block's
//! `time` axis. Readings the provider could not compute arrive as `null`.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGeocoding {
    #[serde(default)]
    pub results: Vec<RawPlace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub admin1: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    pub current: RawCurrent,
    #[serde(default)]
    pub hourly: RawHourly,
    #[serde(default)]
    pub daily: RawDaily,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCurrent {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub weather_code: Option<i32>,
    pub wind_speed_10m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub uv_index: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDaily {
    pub time: Vec<String>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAirQuality {
    pub hourly: Option<RawAirQualityHourly>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAirQualityHourly {
    pub time: Vec<String>,
    pub pm10: Vec<Option<f64>>,
    pub pm2_5: Vec<Option<f64>>,
    pub carbon_monoxide: Vec<Option<f64>>,
    pub nitrogen_dioxide: Vec<Option<f64>>,
    pub sulphur_dioxide: Vec<Option<f64>>,
    pub ozone: Vec<Option<f64>>,
}
