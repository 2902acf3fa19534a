//! Integration tests for clock operations against the store, including the one-live-match rule.

mod common;

use common::{at, control, insert_match, kickoff, ManualClock};
use matchday::{
    ChangeFilter, ChangeKind, ClockError, InMemoryStore, MatchControl, MatchStatus, MatchStore,
    NoGuard, StoreError,
};
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn start_is_rejected_while_same_sport_has_live_match() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let sport = Uuid::new_v4();
    let m1 = insert_match(&store, sport, 600).await;
    let m2 = insert_match(&store, sport, 600).await;

    control.start(m1.id).await.unwrap();
    let err = control.start(m2.id).await.unwrap_err();
    assert_eq!(
        err,
        ClockError::LiveMatchInProgress {
            sport_id: sport,
            running: m1.id
        }
    );
    assert_eq!(err.to_string(), format!("Tournament already has a live match ({})", m1.id));

    let m2_after = store.fetch_match(m2.id).await.unwrap();
    assert_eq!(m2_after, m2);
}

#[tokio::test]
async fn start_in_other_sport_succeeds() {
    let store = Arc::new(InMemoryStore::new());
    let control = control(&store, ManualClock::new(kickoff()));
    let m1 = insert_match(&store, Uuid::new_v4(), 600).await;
    let m2 = insert_match(&store, Uuid::new_v4(), 600).await;

    control.start(m1.id).await.unwrap();
    let started = control.start(m2.id).await.unwrap();
    assert!(started.clock.is_running());
}

#[tokio::test]
async fn start_allowed_once_other_match_paused() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let sport = Uuid::new_v4();
    let m1 = insert_match(&store, sport, 600).await;
    let m2 = insert_match(&store, sport, 600).await;

    control.start(m1.id).await.unwrap();
    clock.set(at(60));
    control.pause(m1.id).await.unwrap();
    assert!(control.start(m2.id).await.is_ok());
}

#[tokio::test]
async fn restarting_running_match_returns_it_unchanged() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let m = insert_match(&store, Uuid::new_v4(), 600).await;

    let first = control.start(m.id).await.unwrap();
    clock.set(at(30));
    let second = control.start(m.id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(second.clock.started_at(), Some(kickoff()));
}

#[tokio::test]
async fn finished_match_cannot_start_or_reset() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let m = insert_match(&store, Uuid::new_v4(), 600).await;

    control.start(m.id).await.unwrap();
    clock.set(at(200));
    let finished = control.finish(m.id).await.unwrap();
    assert_eq!(finished.clock.status(), MatchStatus::Finished);
    assert_eq!(finished.clock.elapsed_seconds(), 200);

    assert_eq!(control.start(m.id).await.unwrap_err(), ClockError::AlreadyFinished);
    assert_eq!(control.reset(m.id, None).await.unwrap_err(), ClockError::AlreadyFinished);
    assert_eq!(control.finish(m.id).await.unwrap(), finished);
}

#[tokio::test]
async fn pause_and_reset_roundtrip_through_store() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let m = insert_match(&store, Uuid::new_v4(), 600).await;

    control.start(m.id).await.unwrap();
    clock.set(at(75));
    let paused = control.pause(m.id).await.unwrap();
    assert_eq!(paused.clock.elapsed_seconds(), 75);
    assert_eq!(control.pause(m.id).await.unwrap(), paused);

    let reset = control.reset(m.id, Some(900)).await.unwrap();
    assert_eq!(reset.clock.status(), MatchStatus::Scheduled);
    assert_eq!(reset.clock.elapsed_seconds(), 0);
    assert_eq!(reset.clock.duration_seconds(), 900);
}

#[tokio::test]
async fn auto_finish_waits_for_expiry() {
    let store = Arc::new(InMemoryStore::new());
    let clock = ManualClock::new(kickoff());
    let control = control(&store, clock.clone());
    let m = insert_match(&store, Uuid::new_v4(), 600).await;

    control.start(m.id).await.unwrap();
    clock.set(at(599));
    assert_eq!(control.auto_finish(m.id).await.unwrap(), None);
    clock.set(at(600));
    let finished = control.auto_finish(m.id).await.unwrap().unwrap();
    assert_eq!(finished.clock.status(), MatchStatus::Finished);
    // Second call finds nothing running.
    assert_eq!(control.auto_finish(m.id).await.unwrap(), None);
}

#[tokio::test]
async fn store_errors_propagate() {
    let store = Arc::new(InMemoryStore::new());
    let control = control(&store, ManualClock::new(kickoff()));
    let m = insert_match(&store, Uuid::new_v4(), 600).await;

    store.set_available(false);
    assert!(matches!(
        control.start(m.id).await,
        Err(ClockError::Store(StoreError::Unavailable(_)))
    ));
    store.set_available(true);

    let missing = Uuid::new_v4();
    assert_eq!(
        control.pause(missing).await.unwrap_err(),
        ClockError::Store(StoreError::MatchNotFound(missing))
    );
}

#[tokio::test]
async fn no_guard_allows_parallel_live_matches() {
    let store = Arc::new(InMemoryStore::new());
    let control = MatchControl::new(store.clone(), NoGuard);
    let sport = Uuid::new_v4();
    let m1 = insert_match(&store, sport, 600).await;
    let m2 = insert_match(&store, sport, 600).await;

    control.start(m1.id).await.unwrap();
    assert!(control.start(m2.id).await.is_ok());
}

#[tokio::test]
async fn lifecycle_writes_notify_subscribers() {
    let store = Arc::new(InMemoryStore::new());
    let control = control(&store, ManualClock::new(kickoff()));
    let m = insert_match(&store, Uuid::new_v4(), 600).await;
    let mut updates = store.subscribe(ChangeFilter::Match(m.id));

    control.start(m.id).await.unwrap();
    let change = updates.next().await.unwrap();
    assert_eq!(change.kind, ChangeKind::Updated);
    assert_eq!(change.match_id, Some(m.id));
    assert!(change.row.unwrap().clock.is_running());
}
