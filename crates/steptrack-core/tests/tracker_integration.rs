//! End-to-end tests over the tracker façade: CSV store on disk, manual
//! clock, paused tokio time so ticks are deterministic.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use steptrack_core::{
    Config, CsvLogStore, LogStore, ManualClock, Step, TimeEvent, TimeLog, Tracker,
};

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 28, h, m, s).unwrap()
}

fn setup(now: DateTime<Utc>) -> (TempDir, Arc<CsvLogStore>, Arc<ManualClock>, Tracker) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvLogStore::new(dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(now));
    let tracker = Tracker::new(store.clone(), clock.clone(), &Config::default());
    (dir, store, clock, tracker)
}

async fn recv_n(rx: &mut tokio::sync::broadcast::Receiver<TimeEvent>, n: usize) -> Vec<TimeEvent> {
    let mut events = Vec::with_capacity(n);
    for _ in 0..n {
        events.push(rx.recv().await.unwrap());
    }
    events
}

#[tokio::test(start_paused = true)]
async fn load_replays_history_then_idle_ticks_stay_inactive() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 31, 0));
    store.create_activity("alpha").unwrap();
    store
        .append("alpha", &TimeLog::new(Step::Meeting, at(10, 18, 0)))
        .unwrap();
    store
        .append("alpha", &TimeLog::new(Step::Implement, at(10, 28, 0)))
        .unwrap();
    store
        .append("alpha", &TimeLog::new(Step::Pause, at(10, 30, 0)))
        .unwrap();

    let mut rx = tracker.subscribe();
    let last = tracker.create_or_load("alpha").unwrap();
    assert_eq!(last, Some(TimeLog::new(Step::Pause, at(10, 30, 0))));

    let replay = recv_n(&mut rx, Step::TRACKED.len()).await;
    assert_eq!(replay.len(), 9);
    assert!(replay.iter().all(|e| e.activity == "alpha" && !e.is_active));
    assert_eq!(replay[0].step, Step::Meeting);
    assert_eq!(replay[0].duration_secs, 600);
    let implement = replay.iter().find(|e| e.step == Step::Implement).unwrap();
    assert_eq!(implement.duration_secs, 120);
    let total = replay.last().unwrap();
    assert_eq!(total.step, Step::Total);
    assert_eq!(total.duration_secs, 720);

    // Nothing is open, so ticks restate an unchanged, inactive total.
    for _ in 0..2 {
        let idle = rx.recv().await.unwrap();
        assert_eq!(idle.step, Step::Total);
        assert_eq!(idle.duration_secs, 720);
        assert!(!idle.is_active);
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_increment_open_steps_and_total() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 5, 0));
    store.create_activity("alpha").unwrap();
    store
        .append("alpha", &TimeLog::new(Step::Implement, at(10, 0, 0)))
        .unwrap();

    let mut rx = tracker.subscribe();
    tracker.create_or_load("alpha").unwrap();

    let replay = recv_n(&mut rx, Step::TRACKED.len()).await;
    let implement = replay.iter().find(|e| e.step == Step::Implement).unwrap();
    assert!(implement.is_active);
    assert_eq!(implement.duration_secs, 300);

    for expected in [301u64, 302] {
        let step_event = rx.recv().await.unwrap();
        assert_eq!(step_event.step, Step::Implement);
        assert_eq!(step_event.duration_secs, expected);
        assert!(step_event.is_active);

        let total_event = rx.recv().await.unwrap();
        assert_eq!(total_event.step, Step::Total);
        assert_eq!(total_event.duration_secs, expected);
        assert!(total_event.is_active);
    }
}

#[tokio::test(start_paused = true)]
async fn step_events_append_to_the_log_and_notify() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 0, 0));

    let mut rx = tracker.subscribe();
    assert_eq!(tracker.create_or_load("alpha").unwrap(), None);
    let replay = recv_n(&mut rx, Step::TRACKED.len()).await;
    assert!(replay.iter().all(|e| e.duration_secs == 0 && !e.is_active));

    tracker.start_step(Step::Implement).unwrap();
    let step_event = rx.recv().await.unwrap();
    assert_eq!(step_event.step, Step::Implement);
    assert!(step_event.is_active);
    let total_event = rx.recv().await.unwrap();
    assert_eq!(total_event.step, Step::Total);
    assert!(total_event.is_active);

    let logs = store.read_all("alpha").unwrap();
    assert_eq!(logs, vec![TimeLog::new(Step::Implement, at(10, 0, 0))]);

    // One live tick accrues onto the open step.
    let tick_event = rx.recv().await.unwrap();
    assert_eq!(tick_event.step, Step::Implement);
    assert_eq!(tick_event.duration_secs, 1);
    let tick_total = rx.recv().await.unwrap();
    assert_eq!(tick_total.step, Step::Total);
    assert_eq!(tick_total.duration_secs, 1);

    // Pausing clears the set; only an inactive total is announced.
    tracker.start_step(Step::Pause).unwrap();
    let pause_event = rx.recv().await.unwrap();
    assert_eq!(pause_event.step, Step::Total);
    assert!(!pause_event.is_active);
    assert!(tracker.snapshot().iter().all(|e| !e.is_active));
}

#[tokio::test(start_paused = true)]
async fn switching_activities_discards_state_and_stops_the_old_ticker() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 5, 0));
    store.create_activity("alpha").unwrap();
    store
        .append("alpha", &TimeLog::new(Step::Implement, at(10, 0, 0)))
        .unwrap();

    let mut rx = tracker.subscribe();
    tracker.create_or_load("alpha").unwrap();
    recv_n(&mut rx, Step::TRACKED.len()).await;

    assert_eq!(tracker.create_or_load("beta").unwrap(), None);
    let replay = recv_n(&mut rx, Step::TRACKED.len()).await;
    assert!(replay
        .iter()
        .all(|e| e.activity == "beta" && e.duration_secs == 0));

    // Only the new activity's ticker is alive.
    let after = recv_n(&mut rx, 3).await;
    assert!(after.iter().all(|e| e.activity == "beta"));
}

#[tokio::test(start_paused = true)]
async fn start_step_without_an_activity_is_a_noop() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 0, 0));
    let mut rx = tracker.subscribe();

    tracker.start_step(Step::Implement).unwrap();

    assert!(matches!(
        rx.try_recv(),
        Err(tokio::sync::broadcast::error::TryRecvError::Empty)
    ));
    assert!(store.recent_activities(10).unwrap().is_empty());
    assert!(tracker.activity().is_none());
}

#[tokio::test(start_paused = true)]
async fn reload_bootstraps_open_steps_from_the_log() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = Arc::new(CsvLogStore::new(dir.path()).unwrap());
        let clock = Arc::new(ManualClock::new(at(10, 0, 0)));
        let mut tracker = Tracker::new(store, clock, &Config::default());
        tracker.create_or_load("alpha").unwrap();
        tracker.start_step(Step::Investigate).unwrap();
        tracker.start_step(Step::WaitForReviewStart).unwrap();
    }

    // Fresh tracker, ten minutes later: the unmatched parallel start is
    // still open and has been accruing the whole time.
    let store = Arc::new(CsvLogStore::new(dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(at(10, 10, 0)));
    let mut tracker = Tracker::new(store, clock, &Config::default());
    let mut rx = tracker.subscribe();
    let last = tracker.create_or_load("alpha").unwrap();
    assert_eq!(
        last,
        Some(TimeLog::new(Step::WaitForReviewStart, at(10, 0, 0)))
    );

    let replay = recv_n(&mut rx, Step::TRACKED.len()).await;
    let wait = replay
        .iter()
        .find(|e| e.step == Step::WaitForReviewStart)
        .unwrap();
    assert!(wait.is_active);
    assert_eq!(wait.duration_secs, 600);
    let investigate = replay.iter().find(|e| e.step == Step::Investigate).unwrap();
    assert!(!investigate.is_active);
    assert_eq!(investigate.duration_secs, 0);
    let total = replay.last().unwrap();
    assert_eq!(total.step, Step::Total);
    assert!(total.is_active);
    assert_eq!(total.duration_secs, 600);
}

#[tokio::test(start_paused = true)]
async fn load_latest_picks_the_most_recently_touched_activity() {
    let (_dir, store, _clock, mut tracker) = setup(at(10, 0, 0));
    for name in ["old", "new"] {
        store.create_activity(name).unwrap();
        store
            .append(name, &TimeLog::new(Step::Other, at(9, 0, 0)))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    let loaded = tracker.load_latest().unwrap().unwrap();
    assert_eq!(loaded.0, "new");
    assert_eq!(tracker.activity().as_deref(), Some("new"));
}

#[tokio::test(start_paused = true)]
async fn load_latest_with_no_activities_loads_nothing() {
    let (_dir, _store, _clock, mut tracker) = setup(at(10, 0, 0));
    assert!(tracker.load_latest().unwrap().is_none());
    assert!(tracker.activity().is_none());
}
