//! # steptrack core library
//!
//! Tracks how long a single active task spends in named steps, derived from
//! an append-only (step, timestamp) log per activity. Sequential steps are
//! mutually exclusive; parallel steps (start/end pairs) may overlap them,
//! so per-step durations and the deduplicated union `Total` are computed
//! independently.
//!
//! ## Key components
//!
//! - [`Step`]: the step taxonomy (sequential, parallel pairs, pause, total)
//! - [`reconstruct`]: pure log-to-duration-table rebuild
//! - [`ActiveSet`]: the steps currently open
//! - [`Tracker`]: façade owning the live ticker and the event stream
//! - [`CsvLogStore`]: append-only CSV persistence, one file per activity

pub mod active;
pub mod clock;
pub mod error;
pub mod events;
pub mod history;
pub mod step;
pub mod storage;
pub mod summary;
pub mod tracker;

pub use active::ActiveSet;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, StorageError};
pub use events::TimeEvent;
pub use history::{reconstruct, union_total, DurationTable};
pub use step::{ParseStepError, Step, StepKind, TimeLog};
pub use storage::{Config, CsvLogStore, LogStore, WeekConfig};
pub use summary::{first_day_of_week, week_summary, ActivityTotal};
pub use tracker::Tracker;
