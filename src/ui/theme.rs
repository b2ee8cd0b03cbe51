use log::warn;
use ratatui::style::{Color, Modifier, Style};

use crate::config::{parse_hex_rgb, Config};

/// Border and title bar colour
pub const ACCENT: Color = Color::Rgb(0xFF, 0x2A, 0x6D);

/// Status message colour
pub const STATUS: Color = Color::Rgb(0x04, 0xB5, 0x75);

const MUTED: Color = Color::DarkGray;

/// Styles derived from the configured colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub dim_secondary: Color,
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary: resolve("PRIMARYCOLOR", config.primary_color.as_deref()),
            secondary: resolve("SECONDARYCOLOR", config.secondary_color.as_deref()),
            dim_secondary: resolve("SECONDARYCOLOR (dimmed)", config.dim_secondary().as_deref()),
        }
    }

    pub fn title_bar(&self) -> Style {
        Style::default()
            .bg(ACCENT)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(ACCENT)
    }

    pub fn item_title(&self, selected: bool) -> Style {
        let style = Style::default().fg(self.primary);
        if selected {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn item_description(&self, selected: bool) -> Style {
        if selected {
            Style::default().fg(self.secondary)
        } else {
            Style::default().fg(self.dim_secondary)
        }
    }

    pub fn selection_bar(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn status(&self) -> Style {
        Style::default().fg(STATUS)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(MUTED)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Reset,
            secondary: Color::Reset,
            dim_secondary: Color::Reset,
        }
    }
}

/// Parse a configured `#RRGGBB` colour, falling back to the terminal default
fn resolve(key: &str, value: Option<&str>) -> Color {
    match value.map(|hex| (hex, parse_hex_rgb(hex))) {
        Some((_, Some([r, g, b]))) => Color::Rgb(r, g, b),
        Some((hex, None)) => {
            warn!("{} is not a #RRGGBB colour: {:?}", key, hex);
            Color::Reset
        }
        None => Color::Reset,
    }
}
