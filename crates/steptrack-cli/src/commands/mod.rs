pub mod activity;
pub mod status;
pub mod step;
pub mod summary;
pub mod watch;

use std::sync::Arc;

use steptrack_core::{storage, Config, CsvLogStore, SystemClock, Tracker};

pub type CliError = Box<dyn std::error::Error>;

fn open_store() -> Result<CsvLogStore, CliError> {
    Ok(CsvLogStore::new(storage::activities_dir()?)?)
}

fn open_tracker() -> Result<(Tracker, Config), CliError> {
    let config = Config::load()?;
    let tracker = Tracker::new(Arc::new(open_store()?), Arc::new(SystemClock), &config);
    Ok((tracker, config))
}

fn format_duration(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
