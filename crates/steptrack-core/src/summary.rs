//! Week summary: per-day union totals across recently touched activities.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::clock::Clock;
use crate::error::Result;
use crate::history::union_total;
use crate::step::TimeLog;
use crate::storage::LogStore;

/// One activity's union total for a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTotal {
    pub name: String,
    pub duration: TimeDelta,
}

/// Monday of the week containing `date`.
pub fn first_day_of_week(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Union totals per day for the week containing `date`, drawn from the most
/// recently touched activities. Weekdays only unless `include_weekends`.
pub fn week_summary(
    store: &dyn LogStore,
    clock: &dyn Clock,
    date: NaiveDate,
    include_weekends: bool,
    recent_limit: usize,
) -> Result<BTreeMap<NaiveDate, Vec<ActivityTotal>>> {
    let now = clock.now();
    let monday = first_day_of_week(date);
    let days = if include_weekends { 7 } else { 5 };

    let mut activities: Vec<(String, Vec<TimeLog>)> = Vec::new();
    for name in store.recent_activities(recent_limit)? {
        let logs = store.read_all(&name)?;
        activities.push((name, logs));
    }

    let mut summary = BTreeMap::new();
    for offset in 0..days {
        let day = monday + TimeDelta::days(offset);
        let mut totals = Vec::new();
        for (name, logs) in &activities {
            let of_day: Vec<TimeLog> = logs
                .iter()
                .filter(|log| log.at.date_naive() == day)
                .copied()
                .collect();
            if of_day.is_empty() {
                continue;
            }
            totals.push(ActivityTotal {
                name: name.clone(),
                duration: union_total(&of_day, now),
            });
        }
        summary.insert(day, totals);
    }
    Ok(summary)
}
