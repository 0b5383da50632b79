use std::time::{Duration, Instant};

use super::*;
use crate::config::SessionConfig;

#[test]
fn drop_stops_thread_promptly() {
    let store = Arc::new(SessionStore::default());
    let started = Instant::now();
    let sweeper = SessionSweeper::spawn(Arc::clone(&store)).unwrap();
    drop(sweeper);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn sweeps_idle_sessions_in_background() {
    let store = Arc::new(SessionStore::new(SessionConfig {
        idle_ttl_secs: 0,
        sweep_interval_secs: 1,
        ..SessionConfig::default()
    }));
    store.snapshot("idle").unwrap();
    let sweeper = SessionSweeper::spawn(Arc::clone(&store)).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !store.is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    sweeper.stop();
    assert!(store.is_empty());
}
