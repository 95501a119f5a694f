//! TOML application configuration.
//!
//! Stored at `<data_dir>/config.toml`. A missing file means defaults; every
//! field has a serde default so partial files load cleanly.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Week summary configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekConfig {
    #[serde(default)]
    pub include_weekends: bool,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between live duration updates.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// How many recently touched activities listings and summaries consider.
    #[serde(default = "default_recent_limit")]
    pub recent_activities_limit: usize,
    #[serde(default)]
    pub week: WeekConfig,
}

fn default_tick_interval() -> u64 {
    1
}
fn default_recent_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            recent_activities_limit: default_recent_limit(),
            week: WeekConfig::default(),
        }
    }
}

impl Config {
    /// Load from `<data_dir>/config.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = super::data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }
}
