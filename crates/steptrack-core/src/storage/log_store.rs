//! Append-only CSV log store, one `<activity>.csv` file per activity.
//!
//! Row format: `at,step` with RFC 3339 timestamps. The log must tolerate
//! stray or truncated trailing writes, so malformed rows are skipped on
//! read instead of failing the whole file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::error::StorageError;
use crate::step::TimeLog;

/// Persistent store for activity time logs.
pub trait LogStore: Send + Sync {
    /// Ensure the activity exists, creating an empty log if needed.
    fn create_activity(&self, name: &str) -> Result<(), StorageError>;

    /// Append one entry to the activity's log.
    fn append(&self, name: &str, log: &TimeLog) -> Result<(), StorageError>;

    /// The full ordered log. Unknown activities are an error; individual
    /// malformed records are skipped.
    fn read_all(&self, name: &str) -> Result<Vec<TimeLog>, StorageError>;

    /// Most recently touched activity, if any.
    fn last_activity_name(&self) -> Result<Option<String>, StorageError>;

    /// Up to `limit` activity names, most recently touched first.
    fn recent_activities(&self, limit: usize) -> Result<Vec<String>, StorageError>;
}

/// CSV files in a single directory.
pub struct CsvLogStore {
    dir: PathBuf,
}

impl CsvLogStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::OpenFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.csv"))
    }
}

impl LogStore for CsvLogStore {
    fn create_activity(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);
        let empty = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);
        if empty {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(["at", "step"])?;
            writer.flush().map_err(StorageError::Io)?;
        }
        Ok(())
    }

    fn append(&self, name: &str, log: &TimeLog) -> Result<(), StorageError> {
        let path = self.path_for(name);
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| StorageError::OpenFailed {
                path: path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(log)?;
        writer.flush().map_err(StorageError::Io)?;
        Ok(())
    }

    fn read_all(&self, name: &str) -> Result<Vec<TimeLog>, StorageError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(StorageError::UnknownActivity(name.to_string()));
        }
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        Ok(reader
            .deserialize::<TimeLog>()
            .filter_map(|record| record.ok())
            .collect())
    }

    fn last_activity_name(&self) -> Result<Option<String>, StorageError> {
        Ok(self.recent_activities(1)?.into_iter().next())
    }

    fn recent_activities(&self, limit: usize) -> Result<Vec<String>, StorageError> {
        let mut entries: Vec<(SystemTime, String)> = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(StorageError::Io)? {
            let entry = entry.map_err(StorageError::Io)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .map_err(StorageError::Io)?;
            entries.push((modified, stem.to_string()));
        }
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(entries
            .into_iter()
            .take(limit)
            .map(|(_, name)| name)
            .collect())
    }
}
