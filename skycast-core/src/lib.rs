//! Core library for the `skycast` weather client.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo provider behind a `WeatherProvider` trait
//! - Normalization of provider responses into a `WeatherSnapshot`
//! - The controller that sequences loads and fills the `DisplayState`
//!
//! It is used by `skycast-cli`, but any front-end that can draw a
//! `DisplayState` can drive the same controller.

pub mod codes;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod icons;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod raw;

pub use config::{AppConfig, Endpoints};
pub use controller::{Controller, LoadState, Outcome};
pub use display::{DayCard, DisplayState, Tile, TileKind};
pub use error::{ErrorKind, WeatherError};
pub use icons::IconSet;
pub use model::{
    AirQuality, CurrentConditions, DailyForecast, PlaceQuery, Pollutant, UnitPreference,
    WeatherRequest, WeatherSnapshot,
};
pub use normalize::normalize;
pub use provider::{WeatherProvider, load_snapshot, provider_from_config};
