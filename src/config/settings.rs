//! Editor settings
//!
//! Small JSON file in the platform config directory. Holds the log level and
//! the values prefilled into the form for a new trader.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use crate::constants;

/// Top-level settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub trader_template: TraderTemplate,
}

/// Prefill values for a new trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderTemplate {
    #[serde(default = "default_trader_name")]
    pub name: String,
    #[serde(default = "default_given_name")]
    pub given_name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_trader_name() -> String {
    constants::trader::DEFAULT_NAME.to_string()
}

fn default_given_name() -> String {
    constants::trader::DEFAULT_GIVEN_NAME.to_string()
}

fn default_role() -> String {
    constants::trader::DEFAULT_ROLE.to_string()
}

impl Default for TraderTemplate {
    fn default() -> Self {
        Self {
            name: default_trader_name(),
            given_name: default_given_name(),
            role: default_role(),
        }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            trader_template: TraderTemplate::default(),
        }
    }
}

/// Map a level name to a tracing level; unknown names mean info
pub fn parse_log_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl EditorSettings {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(constants::config::APP_DIR);
        path.push(constants::config::FILENAME);
        path
    }

    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "Settings file not found, creating default");
            let settings = Self::default();
            settings.save_to(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        let settings: EditorSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings JSON from {:?}", path))?;

        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Level from the environment override, else from the file
    pub fn tracing_level(&self, env_override: Option<&str>) -> Level {
        parse_log_level(env_override.unwrap_or(&self.log_level))
    }
}
