use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::speed::SpeedLabel;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "terminal-default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub key_bg: String,
    pub key_fg: String,
    pub key_slow: String,
    pub key_normal: String,
    pub key_fast: String,
    pub key_pressed: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("fasttype")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => warn!(path = %user_theme_path.display(), error = %e, "bad user theme"),
                }
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// Load `name`, falling back to the default theme when it does not exist.
    pub fn resolve(name: &str) -> Self {
        match Self::load(name) {
            Some(theme) => {
                debug!(theme = name, "theme loaded");
                theme
            }
            None => {
                warn!(theme = name, "unknown theme, using default");
                Self::default()
            }
        }
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_correct: "#a6e3a1".to_string(),
            text_incorrect: "#f38ba8".to_string(),
            text_incorrect_bg: "#45273a".to_string(),
            text_pending: "#585b70".to_string(),
            text_cursor_bg: "#f5e0dc".to_string(),
            text_cursor_fg: "#1e1e2e".to_string(),
            accent: "#89b4fa".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            key_bg: "#313244".to_string(),
            key_fg: "#cdd6f4".to_string(),
            key_slow: "#f38ba8".to_string(),
            key_normal: "#f9e2af".to_string(),
            key_fast: "#a6e3a1".to_string(),
            key_pressed: "#89b4fa".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn key_bg(&self) -> Color { Self::parse_color(&self.key_bg) }
    pub fn key_fg(&self) -> Color { Self::parse_color(&self.key_fg) }
    pub fn key_pressed(&self) -> Color { Self::parse_color(&self.key_pressed) }

    /// Tile background for a speed label.
    pub fn key_label_bg(&self, label: SpeedLabel) -> Color {
        match label {
            SpeedLabel::None => self.key_bg(),
            SpeedLabel::Slow => Self::parse_color(&self.key_slow),
            SpeedLabel::Normal => Self::parse_color(&self.key_normal),
            SpeedLabel::Fast => Self::parse_color(&self.key_fast),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("00ff00"), Color::Rgb(0, 255, 0));
        assert_eq!(ThemeColors::parse_color("#xyz"), Color::White);
    }

    #[test]
    fn test_bundled_themes_all_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&DEFAULT_THEME.to_string()));
        for name in names {
            let file = ThemeAssets::get(&format!("{name}.toml")).unwrap();
            let content = std::str::from_utf8(file.data.as_ref()).unwrap();
            let theme: Theme = toml::from_str(content)
                .unwrap_or_else(|e| panic!("theme {name} does not parse: {e}"));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        let theme = Theme::resolve("definitely-not-a-theme");
        assert_eq!(theme.name, DEFAULT_THEME);
    }

    #[test]
    fn test_label_colors_are_distinct() {
        let colors = ThemeColors::default();
        let bgs = [
            colors.key_label_bg(SpeedLabel::None),
            colors.key_label_bg(SpeedLabel::Slow),
            colors.key_label_bg(SpeedLabel::Normal),
            colors.key_label_bg(SpeedLabel::Fast),
        ];
        for (i, a) in bgs.iter().enumerate() {
            for b in &bgs[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
