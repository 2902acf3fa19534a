//! Shared helpers for the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use matchday::{
    ClockSnapshot, InMemoryStore, MatchControl, MatchRow, MatchStore, NewMatch, SameSportGuard,
    SportId, TeamId, WallClock,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 2026-10-18 09:00:00 UTC.
pub fn kickoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

/// `kickoff()` plus `secs` seconds.
pub fn at(secs: i64) -> DateTime<Utc> {
    kickoff() + Duration::seconds(secs)
}

pub fn at_ms(ms: i64) -> DateTime<Utc> {
    kickoff() + Duration::milliseconds(ms)
}

pub fn teams(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

/// Clock set by hand.
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Wall clock driven by tokio's (pausable) time, starting at `kickoff()`.
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            origin: tokio::time::Instant::now(),
        })
    }
}

impl WallClock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = tokio::time::Instant::now() - self.origin;
        kickoff() + Duration::from_std(elapsed).unwrap()
    }
}

pub type Control = MatchControl<InMemoryStore, SameSportGuard<InMemoryStore>>;

pub fn control(store: &Arc<InMemoryStore>, clock: Arc<dyn WallClock>) -> Control {
    MatchControl::new(store.clone(), SameSportGuard::new(store.clone())).with_clock(clock)
}

/// Insert one scheduled match between two fresh teams.
pub async fn insert_match(store: &InMemoryStore, sport_id: SportId, duration: u32) -> MatchRow {
    let rows = store
        .insert_matches(vec![NewMatch {
            sport_id,
            team_a_id: Uuid::new_v4(),
            team_b_id: Uuid::new_v4(),
            start_time: None,
            round: Some("Group A – R1".to_string()),
            group_label: Some("A".to_string()),
            clock: ClockSnapshot::scheduled(duration),
        }])
        .await
        .unwrap();
    rows.into_iter().next().unwrap()
}
