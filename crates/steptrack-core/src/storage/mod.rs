//! Storage: per-activity CSV logs, TOML configuration, data directory.

mod config;
pub mod log_store;

pub use config::{Config, WeekConfig};
pub use log_store::{CsvLogStore, LogStore};

use std::path::PathBuf;

/// Returns `~/.config/steptrack[-dev]/` based on STEPTRACK_ENV.
///
/// Set STEPTRACK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STEPTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("steptrack-dev")
    } else {
        base_dir.join("steptrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Directory holding the per-activity log files.
pub fn activities_dir() -> Result<PathBuf, std::io::Error> {
    let dir = data_dir()?.join("activities");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
