//! Reconstruction of step durations from an activity's time log.
//!
//! Two independent passes over the same ordered log: per-step attribution
//! (each step's own occurrences, summed, with no cross-step deduplication)
//! and the union `Total` (wall-clock time covered by at least one open
//! session, counted once). When sequential and parallel work overlap the
//! per-step rows legitimately sum to more than `Total`.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::step::{Step, StepKind, TimeLog};

/// Accumulated duration per tracked step, `Step::Total` last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationTable {
    entries: BTreeMap<Step, TimeDelta>,
}

impl DurationTable {
    /// A fresh all-zero table covering every tracked step.
    pub fn new() -> Self {
        Self {
            entries: Step::TRACKED
                .iter()
                .map(|&step| (step, TimeDelta::zero()))
                .collect(),
        }
    }

    pub fn get(&self, step: Step) -> TimeDelta {
        self.entries
            .get(&step)
            .copied()
            .unwrap_or_else(TimeDelta::zero)
    }

    pub fn total(&self) -> TimeDelta {
        self.get(Step::Total)
    }

    /// Accumulate `delta` onto a step's row.
    ///
    /// # Panics
    /// A negative interval means the log is out of order; that is an
    /// invariant violation and aborts rather than being clamped away.
    pub fn add(&mut self, step: Step, delta: TimeDelta) {
        let current = self.get(step);
        self.entries.insert(step, current + non_negative(delta));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Step, TimeDelta)> + '_ {
        self.entries.iter().map(|(&step, &delta)| (step, delta))
    }
}

impl Default for DurationTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the duration table for one activity log as of `now`.
///
/// Pure: the same log and the same `now` always produce the same table.
pub fn reconstruct(logs: &[TimeLog], now: DateTime<Utc>) -> DurationTable {
    let mut table = DurationTable::new();
    attribute_steps(logs, now, &mut table);
    table.add(Step::Total, union_total(logs, now));
    table
}

/// Per-step attribution: every entry except pauses and parallel ends
/// accrues from its own timestamp to its terminating instant.
fn attribute_steps(logs: &[TimeLog], now: DateTime<Utc>, table: &mut DurationTable) {
    for (index, log) in logs.iter().enumerate() {
        if matches!(log.step.kind(), StepKind::Pause | StepKind::ParallelEnd) {
            continue;
        }
        let end = step_end(logs, index).unwrap_or(now);
        table.add(log.step, end - log.at);
    }
}

/// The instant an entry stops accruing: for a parallel start, the first
/// later entry that is its paired end or a pause; for anything else, the
/// first later entry that is not a parallel end. `None` means the entry is
/// still open.
fn step_end(logs: &[TimeLog], index: usize) -> Option<DateTime<Utc>> {
    let log = &logs[index];
    let rest = &logs[index + 1..];
    let found = if log.step.kind() == StepKind::ParallelStart {
        let end_step = log.step.parallel_end();
        rest.iter()
            .find(|later| later.step == end_step || later.step == Step::Pause)
    } else {
        rest.iter()
            .find(|later| later.step.kind() != StepKind::ParallelEnd)
    };
    found.map(|later| later.at)
}

/// Identity of an open session marker. All sequential steps share one
/// identity (they are mutually exclusive); each parallel start keeps its
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerId {
    Sequential,
    Parallel(Step),
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    id: MarkerId,
    at: DateTime<Utc>,
}

/// Union attribution: the wall-clock length of the time covered by at least
/// one open session, counted once regardless of overlap.
///
/// Streams over the log keeping the list of open markers; the first marker
/// always carries the earliest open instant.
pub fn union_total(logs: &[TimeLog], now: DateTime<Utc>) -> TimeDelta {
    let mut markers: Vec<Marker> = Vec::new();
    let mut total = TimeDelta::zero();

    for log in logs {
        if opens_session(log.step) {
            open_marker(&mut markers, log);
        } else if closes_all_sessions(&markers, log.step) {
            let start = markers.first().map_or(log.at, |marker| marker.at);
            total = total + non_negative(log.at - start);
            markers.clear();
        } else if closes_one_parallel(&markers, log.step) {
            remove_parallel_marker(&mut markers, log.step.parallel_start());
        }
    }

    // A session left open at the end of the log runs until now.
    if let Some(first) = markers.first() {
        total = total + non_negative(now - first.at);
    }
    total
}

fn opens_session(step: Step) -> bool {
    matches!(step.kind(), StepKind::Sequential | StepKind::ParallelStart)
}

/// Open a marker for a session-starting entry. A parallel start absorbs a
/// running sequential session: the sequential marker is dropped and its
/// (earlier) start instant carries over, so the union interval stays keyed
/// to the earliest open instant. Duplicate identities are not re-opened.
fn open_marker(markers: &mut Vec<Marker>, log: &TimeLog) {
    let mut marker = match log.step.kind() {
        StepKind::ParallelStart => Marker {
            id: MarkerId::Parallel(log.step),
            at: log.at,
        },
        _ => Marker {
            id: MarkerId::Sequential,
            at: log.at,
        },
    };

    if log.step.kind() == StepKind::ParallelStart {
        let earliest = markers.first().copied();
        markers.retain(|m| matches!(m.id, MarkerId::Parallel(_)));
        if let Some(first) = earliest {
            if first.id == MarkerId::Sequential {
                marker.at = first.at;
            }
        }
    }

    if markers.iter().all(|m| m.id != marker.id) {
        markers.push(marker);
    }
}

/// True when this entry closes the whole union interval: any pause, any
/// closing entry with nothing open, or the designated closer of the sole
/// remaining marker.
fn closes_all_sessions(markers: &[Marker], step: Step) -> bool {
    if step == Step::Pause || markers.is_empty() {
        return true;
    }
    if markers.len() >= 2 {
        return false;
    }
    match markers[0].id {
        MarkerId::Parallel(start) => step == start.parallel_end(),
        MarkerId::Sequential => false,
    }
}

fn closes_one_parallel(markers: &[Marker], step: Step) -> bool {
    step.kind() == StepKind::ParallelEnd
        && markers
            .iter()
            .any(|m| m.id == MarkerId::Parallel(step.parallel_start()))
}

/// Remove one parallel marker while others stay open. If the removed marker
/// was the earliest, its start instant transfers to the new first marker so
/// the union keeps covering the true earliest open instant.
fn remove_parallel_marker(markers: &mut Vec<Marker>, start_step: Step) {
    let removed_id = MarkerId::Parallel(start_step);
    let earliest = markers.first().copied();
    markers.retain(|m| m.id != removed_id);

    if let Some(first) = earliest {
        if first.id == removed_id {
            if let Some(next) = markers.first_mut() {
                next.at = first.at;
            }
        }
    }
}

fn non_negative(delta: TimeDelta) -> TimeDelta {
    assert!(
        delta >= TimeDelta::zero(),
        "log out of order: negative interval {delta}"
    );
    delta
}
