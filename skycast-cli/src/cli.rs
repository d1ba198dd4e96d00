use std::fmt;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Select, Text};
use skycast_core::{AppConfig, Controller, LoadState, Outcome, UnitPreference, provider_from_config};

use crate::render::Renderer;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather, 7-day forecast and air quality")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the default place and unit.
    Configure,

    /// Load and show the weather once.
    Show {
        /// Place name; the configured default when absent.
        place: Option<String>,

        /// "celsius" or "fahrenheit".
        #[arg(long, value_parser = parse_unit)]
        unit: Option<UnitPreference>,
    },

    /// Interactive display: search places and switch units.
    Run {
        /// "celsius" or "fahrenheit".
        #[arg(long, value_parser = parse_unit)]
        unit: Option<UnitPreference>,
    },
}

fn parse_unit(s: &str) -> Result<UnitPreference, String> {
    UnitPreference::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, unit } => show(place, unit).await,
            Command::Run { unit } => interactive(unit).await,
        }
    }
}

fn load_config(unit: Option<UnitPreference>) -> AppConfig {
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {e:#}");
        AppConfig::default()
    });
    if let Some(unit) = unit {
        config.set_unit(unit);
    }
    config
}

fn build(config: AppConfig) -> anyhow::Result<(Controller, Renderer)> {
    let renderer = Renderer::new(&config);
    let provider = provider_from_config(&config)?;
    Ok((Controller::new(provider, config), renderer))
}

/// Show the loading state, give it a moment on screen, then load.
async fn load(controller: &mut Controller, renderer: &Renderer) {
    renderer.draw(controller.display(), controller.unit());
    tokio::time::sleep(controller.config().load_delay()).await;
    controller.run_pending_load().await;
    renderer.draw(controller.display(), controller.unit());
}

async fn show(place: Option<String>, unit: Option<UnitPreference>) -> anyhow::Result<()> {
    let (mut controller, renderer) = build(load_config(unit))?;

    let queued = match place {
        Some(place) => controller.submit_search(&place),
        None => controller.start(),
    };
    if !queued {
        return Err(anyhow!("{}", controller.display().status));
    }

    load(&mut controller, &renderer).await;

    match controller.state() {
        LoadState::Idle(Outcome::Failure(kind)) => {
            Err(anyhow!("Weather for '{}' could not be loaded ({kind})", controller.place_name()))
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Search,
    ChangeUnit,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search another place",
            Action::ChangeUnit => "Change unit",
            Action::Quit => "Quit",
        })
    }
}

async fn interactive(unit: Option<UnitPreference>) -> anyhow::Result<()> {
    let (mut controller, renderer) = build(load_config(unit))?;

    controller.start();
    load(&mut controller, &renderer).await;

    loop {
        let choice = Select::new("What next?", vec![Action::Search, Action::ChangeUnit, Action::Quit])
            .prompt();
        let action = match cancelled(choice)? {
            Some(action) => action,
            None => return Ok(()),
        };

        let queued = match action {
            Action::Search => {
                let input = Text::new("City:").with_default(controller.place_name()).prompt();
                match cancelled(input)? {
                    Some(input) => controller.submit_search(&input),
                    None => continue,
                }
            }
            Action::ChangeUnit => {
                let units = UnitPreference::all().to_vec();
                let cursor = units.iter().position(|u| *u == controller.unit()).unwrap_or(0);
                let selected = Select::new("Unit:", units).with_starting_cursor(cursor).prompt();
                match cancelled(selected)? {
                    Some(unit) => controller.select_unit(unit),
                    None => continue,
                }
            }
            Action::Quit => return Ok(()),
        };

        if queued {
            load(&mut controller, &renderer).await;
        } else {
            // Rejected input still updates the status line.
            renderer.draw(controller.display(), controller.unit());
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;

    let place = Text::new("Default place:").with_default(&config.default_place).prompt()?;
    config.set_default_place(&place)?;

    let units = UnitPreference::all().to_vec();
    let cursor = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    let unit = Select::new("Default unit:", units).with_starting_cursor(cursor).prompt()?;
    config.set_unit(unit);

    config.save()?;
    println!("Saved configuration to {}", AppConfig::config_file_path()?.display());
    Ok(())
}

/// Esc / Ctrl-C become `None`; anything else is a real error.
fn cancelled<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
