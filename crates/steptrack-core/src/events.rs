use serde::{Deserialize, Serialize};

use crate::step::Step;

/// A duration notification pushed to subscribers.
///
/// One event is emitted per duration-table row on activity load, then
/// incrementally for every ticker tick and step transition. For
/// `Step::Total`, `is_active` reports whether any step is open at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEvent {
    pub activity: String,
    pub step: Step,
    pub duration_secs: u64,
    pub is_active: bool,
}
