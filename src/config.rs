use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::keyboard::scheme;

pub const MIN_WORD_COUNT: usize = 5;
pub const MAX_WORD_COUNT: usize = 200;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_keyboard_scheme")]
    pub keyboard_scheme: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_keyboard_scheme() -> String {
    scheme::default_scheme().id.to_string()
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_word_count() -> usize {
    25
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyboard_scheme: default_keyboard_scheme(),
            theme: default_theme(),
            word_count: default_word_count(),
            log_level: default_log_level(),
        }
    }
}

/// One-off settings from the command line. They shape the running session
/// and are never written back to the config file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub theme: Option<String>,
    pub keyboard_scheme: Option<String>,
    pub word_count: Option<usize>,
}

impl Config {
    /// Load the user config. A missing file yields defaults; an unreadable or
    /// malformed file is logged and also yields defaults.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let mut config = match Self::read(path) {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        };
        config.validate();
        config
    }

    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(toml::from_str(&content)?))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fasttype")
            .join("config.toml")
    }

    /// The config in effect for this session: `self` with `overrides` on top.
    pub fn with_overrides(&self, overrides: &Overrides) -> Self {
        let mut config = self.clone();
        if let Some(theme) = &overrides.theme {
            config.theme = theme.clone();
        }
        if let Some(id) = &overrides.keyboard_scheme {
            config.keyboard_scheme = id.clone();
        }
        if let Some(count) = overrides.word_count {
            config.word_count = count;
        }
        config.validate();
        config
    }

    /// Reset an unknown keyboard scheme to the default one.
    pub fn normalize_scheme(&mut self) {
        if !scheme::is_known_scheme(&self.keyboard_scheme) {
            warn!(
                id = %self.keyboard_scheme,
                "unknown keyboard scheme, using {}",
                scheme::default_scheme().id
            );
            self.keyboard_scheme = default_keyboard_scheme();
        }
    }

    pub fn validate(&mut self) {
        self.normalize_scheme();
        self.word_count = self.word_count.clamp(MIN_WORD_COUNT, MAX_WORD_COUNT);
        if self.log_level.parse::<tracing::Level>().is_err() {
            self.log_level = default_log_level();
        }
    }

    /// Step `keyboard_scheme` through the known schemes, wrapping around.
    pub fn cycle_scheme(&mut self, forward: bool) {
        let ids = scheme::scheme_ids();
        self.keyboard_scheme = cycle(&ids, &self.keyboard_scheme, forward).to_string();
    }

    /// Step `theme` through `available`, wrapping around.
    pub fn cycle_theme(&mut self, available: &[String], forward: bool) {
        let names: Vec<&str> = available.iter().map(String::as_str).collect();
        if names.is_empty() {
            return;
        }
        self.theme = cycle(&names, &self.theme, forward).to_string();
    }
}

fn cycle<'a>(options: &[&'a str], current: &str, forward: bool) -> &'a str {
    let len = options.len();
    let idx = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[idx]
}
