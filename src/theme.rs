use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Theme {
    pub transcript_bg: Color,
    pub input_bg: Color,
    pub dropdown_bg: Color,
    pub selected_bg: Color,
    pub status_bg: Color,
    pub text_fg: Color,
    pub muted_fg: Color,
    pub accent_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            transcript_bg: Color::Rgb(24, 24, 27),
            input_bg: Color::Rgb(39, 39, 42),
            dropdown_bg: Color::Rgb(52, 52, 56),
            selected_bg: Color::Rgb(70, 70, 76),
            status_bg: Color::Rgb(18, 18, 20),
            text_fg: Color::Rgb(244, 244, 245),
            muted_fg: Color::Rgb(161, 161, 170),
            accent_fg: Color::Rgb(0, 187, 255),
        }
    }
}

impl Theme {
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path_ref = path.as_ref();
        match fs::read_to_string(path_ref) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(theme) => theme,
                Err(err) => {
                    warn!(
                        path = %path_ref.display(),
                        "failed to parse theme file: {err}; using defaults"
                    );
                    Self::default()
                }
            },
            Err(err) => {
                warn!(
                    path = %path_ref.display(),
                    "failed to read theme file: {err}; using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let cfg: ThemeToml = toml::from_str(s)?;
        let defaults = Self::default();
        let colors = cfg.colors;
        let pick = |value: Option<RgbToml>, fallback: Color| value.map_or(fallback, RgbToml::into_color);
        Ok(Self {
            transcript_bg: pick(colors.transcript_bg, defaults.transcript_bg),
            input_bg: pick(colors.input_bg, defaults.input_bg),
            dropdown_bg: pick(colors.dropdown_bg, defaults.dropdown_bg),
            selected_bg: pick(colors.selected_bg, defaults.selected_bg),
            status_bg: pick(colors.status_bg, defaults.status_bg),
            text_fg: pick(colors.text_fg, defaults.text_fg),
            muted_fg: pick(colors.muted_fg, defaults.muted_fg),
            accent_fg: pick(colors.accent_fg, defaults.accent_fg),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToml {
    colors: ThemeColorsToml,
}

#[derive(Debug, Deserialize)]
struct ThemeColorsToml {
    transcript_bg: Option<RgbToml>,
    input_bg: Option<RgbToml>,
    dropdown_bg: Option<RgbToml>,
    selected_bg: Option<RgbToml>,
    status_bg: Option<RgbToml>,
    text_fg: Option<RgbToml>,
    muted_fg: Option<RgbToml>,
    accent_fg: Option<RgbToml>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RgbToml {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbToml {
    fn into_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}
