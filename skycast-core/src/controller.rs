//! Load sequencing behind the window.
//!
//! The controller owns the current place and unit, decides when a load may
//! start, and turns the outcome into a [`DisplayState`]. At most one load is
//! pending at a time: while [`LoadState::Loading`] every input is refused,
//! which is the same gate the disabled controls give the user.

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::display::DisplayState;
use crate::error::ErrorKind;
use crate::model::{PlaceQuery, UnitPreference, WeatherSnapshot};
use crate::provider::{WeatherProvider, load_snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(ErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet.
    Initial,
    /// A load is queued or running; inputs are disabled.
    Loading,
    /// Waiting for input after the last load finished.
    Idle(Outcome),
}

#[derive(Debug)]
pub struct Controller {
    provider: Box<dyn WeatherProvider>,
    config: AppConfig,
    place_name: String,
    unit: UnitPreference,
    state: LoadState,
    display: DisplayState,
    current: Option<(PlaceQuery, WeatherSnapshot)>,
}

impl Controller {
    pub fn new(provider: Box<dyn WeatherProvider>, config: AppConfig) -> Self {
        Self {
            provider,
            place_name: config.default_place.clone(),
            unit: config.unit,
            config,
            state: LoadState::Initial,
            display: DisplayState::placeholder(),
            current: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn place_name(&self) -> &str {
        &self.place_name
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Place and snapshot of the last successful load, if it is still on screen.
    pub fn snapshot(&self) -> Option<&(PlaceQuery, WeatherSnapshot)> {
        self.current.as_ref()
    }

    /// Queue the startup load for the configured default place.
    pub fn start(&mut self) -> bool {
        if self.state != LoadState::Initial {
            return false;
        }
        self.begin_loading();
        true
    }

    /// Queue a load for `input`. Blank input only updates the status line.
    pub fn submit_search(&mut self, input: &str) -> bool {
        if self.in_flight() {
            return false;
        }

        let term = input.trim();
        if term.is_empty() {
            self.display.status = "Please enter a city name.".to_string();
            self.display.controls_enabled = true;
            return false;
        }

        self.place_name = term.to_string();
        self.begin_loading();
        true
    }

    /// Switch units and queue a reload. Selecting the active unit does nothing.
    pub fn select_unit(&mut self, unit: UnitPreference) -> bool {
        if self.in_flight() || unit == self.unit {
            return false;
        }

        self.unit = unit;
        self.begin_loading();
        true
    }

    /// Run the queued load to completion. Returns `false` if none was queued.
    pub async fn run_pending_load(&mut self) -> bool {
        if !self.in_flight() {
            return false;
        }

        let result =
            load_snapshot(self.provider.as_ref(), &self.place_name, self.unit, &self.config).await;

        match result {
            Ok((place, snapshot)) => {
                self.display = DisplayState::from_snapshot(&place, &snapshot, self.unit);
                self.current = Some((place, snapshot));
                self.state = LoadState::Idle(Outcome::Success);
            }
            Err(err) => {
                let kind = err.kind();
                warn!(place = %self.place_name, %kind, error = %err, "weather load failed");
                self.display = DisplayState::failure(kind);
                self.current = None;
                self.state = LoadState::Idle(Outcome::Failure(kind));
            }
        }

        self.display.controls_enabled = true;
        true
    }

    fn begin_loading(&mut self) {
        info!(place = %self.place_name, unit = %self.unit, "loading weather");
        self.state = LoadState::Loading;
        self.display = DisplayState::loading();
        self.current = None;
    }
}
