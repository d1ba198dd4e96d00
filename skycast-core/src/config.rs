use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::UnitPreference;
use crate::normalize::MAX_DAILY;

pub const DEFAULT_PLACE: &str = "Mombasa";

/// Provider endpoints. Overridable so tests can target a local mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            air_quality: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints under one base URL, as a mock server exposes them.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding: format!("{base}/v1/search"),
            forecast: format!("{base}/v1/forecast"),
            air_quality: format!("{base}/v1/air-quality"),
        }
    }
}

/// Application settings stored on disk.
///
/// Handed to the controller and renderer by value at startup and not
/// modified afterwards.
///
/// Example TOML:
/// default_place = "Mombasa"
/// unit = "fahrenheit"
///
/// [endpoints]
/// forecast = "https://api.open-meteo.com/v1/forecast"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Place loaded on startup.
    pub default_place: String,

    /// Unit selected on startup.
    pub unit: UnitPreference,

    /// Days of daily forecast to show (1..=7).
    pub forecast_days: u8,

    /// Provider timezone parameter; "auto" resolves from the coordinates.
    pub timezone: String,

    /// Pause between showing the loading state and starting the requests.
    pub load_delay_ms: u64,

    /// Directory holding `<code>.png` icon assets. Defaults to `<config dir>/icons`.
    pub icon_dir: Option<PathBuf>,

    pub endpoints: Endpoints,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_place: DEFAULT_PLACE.to_string(),
            unit: UnitPreference::default(),
            forecast_days: MAX_DAILY as u8,
            timezone: "auto".to_string(),
            load_delay_ms: 100,
            icon_dir: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Icon directory, falling back to `<config dir>/icons`.
    pub fn icon_dir(&self) -> Option<PathBuf> {
        self.icon_dir
            .clone()
            .or_else(|| Self::project_dirs().ok().map(|d| d.config_dir().join("icons")))
    }

    /// Forecast length actually shown, whatever the file says.
    pub fn forecast_days(&self) -> u8 {
        self.forecast_days.clamp(1, MAX_DAILY as u8)
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }

    /// Trimmed, non-empty place name; stores nothing otherwise.
    pub fn set_default_place(&mut self, place: &str) -> Result<()> {
        let place = place.trim();
        if place.is_empty() {
            return Err(anyhow!("Default place must not be empty"));
        }
        self.default_place = place.to_string();
        Ok(())
    }

    pub fn set_unit(&mut self, unit: UnitPreference) {
        self.unit = unit;
    }
}
