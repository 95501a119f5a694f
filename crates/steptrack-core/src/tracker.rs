//! The tracker façade: wires the log store, clock, history reconstruction,
//! active-step set and live ticker together behind one event stream.
//!
//! Exactly one activity is loaded at a time. All mutation of the loaded
//! state happens under a single mutex shared by user-driven calls and the
//! ticker task, so ticks and step events never interleave mid-update.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::TimeDelta;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::active::ActiveSet;
use crate::clock::Clock;
use crate::error::Result;
use crate::events::TimeEvent;
use crate::history::{reconstruct, DurationTable};
use crate::step::{Step, StepKind, TimeLog};
use crate::storage::{Config, LogStore};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// State for the one currently loaded activity. Replaced wholesale on every
/// load; never merged across activities.
#[derive(Debug)]
struct LoadedActivity {
    name: String,
    logs: Vec<TimeLog>,
    durations: DurationTable,
    active: ActiveSet,
}

pub struct Tracker {
    store: Arc<dyn LogStore>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    tx: broadcast::Sender<TimeEvent>,
    current: Arc<Mutex<Option<LoadedActivity>>>,
    ticker: Option<JoinHandle<()>>,
}

impl Tracker {
    pub fn new(store: Arc<dyn LogStore>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            clock,
            tick: Duration::from_secs(config.tick_interval_secs.max(1)),
            tx,
            current: Arc::new(Mutex::new(None)),
            ticker: None,
        }
    }

    /// Subscribe to duration events. Subscribers see events in production
    /// order; a load replays the whole table before live updates resume.
    pub fn subscribe(&self) -> broadcast::Receiver<TimeEvent> {
        self.tx.subscribe()
    }

    /// Create the activity if needed, rebuild durations and open steps from
    /// its log, replay the table to subscribers and start the ticker.
    ///
    /// The previous activity's ticker is stopped before anything else so a
    /// stale tick can never touch the new state. Returns the last log entry,
    /// if any. Must be called from within a tokio runtime.
    pub fn create_or_load(&mut self, name: &str) -> Result<Option<TimeLog>> {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        self.store.create_activity(name)?;
        let logs = self.store.read_all(name)?;
        let durations = reconstruct(&logs, self.clock.now());
        let active = ActiveSet::bootstrap(&logs);
        let last = logs.last().copied();

        let loaded = LoadedActivity {
            name: name.to_string(),
            logs,
            durations,
            active,
        };
        for event in replay_events(&loaded) {
            let _ = self.tx.send(event);
        }
        *self.current.lock().unwrap() = Some(loaded);

        self.ticker = Some(spawn_ticker(
            self.tick,
            Arc::clone(&self.current),
            self.tx.clone(),
        ));
        Ok(last)
    }

    /// Load whichever activity was touched most recently.
    pub fn load_latest(&mut self) -> Result<Option<(String, Option<TimeLog>)>> {
        let Some(name) = self.store.last_activity_name()? else {
            return Ok(None);
        };
        let last = self.create_or_load(&name)?;
        Ok(Some((name, last)))
    }

    /// Record a step event for the loaded activity and update the open set.
    /// A no-op when nothing is loaded.
    pub fn start_step(&mut self, step: Step) -> Result<()> {
        let mut guard = self.current.lock().unwrap();
        let Some(current) = guard.as_mut() else {
            return Ok(());
        };

        let log = TimeLog::new(step, self.clock.now());
        self.store.append(&current.name, &log)?;
        current.logs.push(log);
        current.active.apply(step);
        notify_transition(&self.tx, current, step);
        Ok(())
    }

    /// Name of the loaded activity, if any.
    pub fn activity(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|c| c.name.clone())
    }

    /// The current duration table as replay-shaped events.
    pub fn snapshot(&self) -> Vec<TimeEvent> {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(replay_events)
            .unwrap_or_default()
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

fn secs(delta: TimeDelta) -> u64 {
    delta.num_seconds() as u64
}

fn event(current: &LoadedActivity, step: Step) -> TimeEvent {
    let is_active = if step == Step::Total {
        !current.active.is_empty()
    } else {
        current.active.contains(step)
    };
    TimeEvent {
        activity: current.name.clone(),
        step,
        duration_secs: secs(current.durations.get(step)),
        is_active,
    }
}

/// One event per duration row, `Total` last.
fn replay_events(current: &LoadedActivity) -> Vec<TimeEvent> {
    current
        .durations
        .iter()
        .map(|(step, _)| event(current, step))
        .collect()
}

/// A step transition notifies the affected duration row (for a parallel
/// end, its start; a pause has no row of its own) plus `Total`, both with
/// refreshed activity flags.
fn notify_transition(tx: &broadcast::Sender<TimeEvent>, current: &LoadedActivity, step: Step) {
    let row = match step.kind() {
        StepKind::ParallelEnd => Some(step.parallel_start()),
        StepKind::Pause | StepKind::Total => None,
        _ => Some(step),
    };
    if let Some(row) = row {
        let _ = tx.send(event(current, row));
    }
    let _ = tx.send(event(current, Step::Total));
}

fn spawn_ticker(
    period: Duration,
    current: Arc<Mutex<Option<LoadedActivity>>>,
    tx: broadcast::Sender<TimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let delta = TimeDelta::from_std(period).unwrap_or_else(|_| TimeDelta::seconds(1));
        let mut interval = tokio::time::interval(period);
        // The first tick of a tokio interval completes immediately; the
        // replay already covered that instant.
        interval.tick().await;
        loop {
            interval.tick().await;
            tick(delta, &current, &tx);
        }
    })
}

/// One ticker tick: every open step and `Total` gain one interval, each
/// emitting an event. With nothing open the tick only restates `Total`,
/// unchanged and inactive.
fn tick(
    delta: TimeDelta,
    current: &Mutex<Option<LoadedActivity>>,
    tx: &broadcast::Sender<TimeEvent>,
) {
    let mut guard = current.lock().unwrap();
    let Some(current) = guard.as_mut() else {
        return;
    };

    if current.active.is_empty() {
        let _ = tx.send(event(current, Step::Total));
        return;
    }

    let open: Vec<Step> = current.active.iter().collect();
    for step in open {
        current.durations.add(step, delta);
        let _ = tx.send(event(current, step));
    }
    current.durations.add(Step::Total, delta);
    let _ = tx.send(event(current, Step::Total));
}
