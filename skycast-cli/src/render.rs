use std::fmt;

use skycast_core::{AppConfig, DisplayState, IconSet, UnitPreference};

/// Draws a [`DisplayState`] as plain text.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    icons: IconSet,
}

impl Renderer {
    pub fn new(config: &AppConfig) -> Self {
        let icons = config.icon_dir().map(|dir| IconSet::load(&dir)).unwrap_or_default();
        Self { icons }
    }

    pub fn draw(&self, state: &DisplayState, unit: UnitPreference) {
        println!("{}", self.render(state, unit));
    }

    pub fn render(&self, state: &DisplayState, unit: UnitPreference) -> String {
        Screen { renderer: self, state, unit }.to_string()
    }

    fn icon(&self, code: Option<i32>) -> String {
        self.icons
            .icon_for(code)
            .and_then(|p| p.file_name())
            .map(|name| format!("[{}]", name.to_string_lossy()))
            .unwrap_or_default()
    }
}

const RULE: &str = "--------------------------------------------------";

/// One frame of output for a display state.
struct Screen<'a> {
    renderer: &'a Renderer,
    state: &'a DisplayState,
    unit: UnitPreference,
}

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Screen { renderer, state, unit } = self;
        let controls = if state.controls_enabled { "" } else { " (busy)" };

        writeln!(f, "==================================================")?;
        writeln!(f, "{}{}", state.location, controls)?;
        writeln!(f, "{}  {}  [{}]", state.temperature, renderer.icon(state.icon_code), unit.symbol())?;
        writeln!(f, "{}", state.description)?;
        writeln!(f, "{RULE}")?;

        for card in &state.daily {
            writeln!(
                f,
                "{:<4} {:<14} {:<34} {}",
                card.day,
                card.temperatures,
                card.description,
                renderer.icon(card.icon_code)
            )?;
        }
        if !state.daily.is_empty() {
            writeln!(f, "{RULE}")?;
        }

        for pair in state.tiles.chunks(2) {
            let line = pair
                .iter()
                .map(|t| format!("{:<20} {:<14}", format!("{}:", t.kind.label()), t.value))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line.trim_end())?;
        }

        if !state.status.is_empty() {
            writeln!(f, "{RULE}")?;
            writeln!(f, "{}", state.status)?;
        }
        Ok(())
    }
}
