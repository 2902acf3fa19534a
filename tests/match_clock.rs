//! Integration tests for the pure match clock: derived time and lifecycle transitions.

mod common;

use common::{at, at_ms};
use matchday::models::format_mm_ss;
use matchday::{ClockPhase, ClockSnapshot, MatchStatus, AUTO_FINISH_GRACE};
use proptest::prelude::*;
use std::time::Duration;

fn running_since(start_secs: i64, duration: u32) -> ClockSnapshot {
    ClockSnapshot::scheduled(duration).start(at(start_secs))
}

#[test]
fn scheduled_clock_shows_full_duration() {
    let clock = ClockSnapshot::scheduled(600);
    assert_eq!(clock.live_elapsed(at(1000)), 0);
    assert_eq!(clock.remaining(at(1000)), 600);
    assert_eq!(clock.phase(), ClockPhase::Scheduled);
}

#[test]
fn start_sets_running_live_and_timestamp() {
    let clock = running_since(0, 600);
    assert!(clock.is_running());
    assert_eq!(clock.started_at(), Some(at(0)));
    assert_eq!(clock.status(), MatchStatus::Live);
    assert_eq!(clock.phase(), ClockPhase::Running);
}

#[test]
fn live_elapsed_floors_partial_seconds() {
    let clock = running_since(0, 600);
    assert_eq!(clock.live_elapsed(at_ms(1999)), 1);
    assert_eq!(clock.remaining(at_ms(1999)), 599);
}

#[test]
fn skewed_clock_never_counts_backwards() {
    let clock = running_since(10, 600);
    assert_eq!(clock.live_elapsed(at(5)), 0);
    assert_eq!(clock.remaining(at(5)), 600);
}

#[test]
fn remaining_never_goes_negative() {
    let clock = running_since(0, 60);
    assert_eq!(clock.remaining(at(500)), 0);
    assert_eq!(clock.live_elapsed(at(500)), 500);
}

#[test]
fn start_is_noop_when_running() {
    let clock = running_since(0, 600);
    assert_eq!(clock.start(at(30)), clock);
}

#[test]
fn start_then_immediate_pause_keeps_elapsed() {
    let clock = running_since(0, 600).pause(at(0));
    assert_eq!(clock.elapsed_seconds(), 0);
    assert!(!clock.is_running());
    assert_eq!(clock.started_at(), None);
}

#[test]
fn pause_folds_delta_and_stays_live() {
    let clock = running_since(0, 600).pause(at(95));
    assert_eq!(clock.elapsed_seconds(), 95);
    assert_eq!(clock.status(), MatchStatus::Live);
    assert_eq!(clock.phase(), ClockPhase::Paused);
    // Paused time does not run.
    assert_eq!(clock.remaining(at(5000)), 505);
}

#[test]
fn pause_twice_equals_pause_once() {
    let once = running_since(0, 600).pause(at(40));
    let twice = once.pause(at(80));
    assert_eq!(once, twice);
}

#[test]
fn resume_accumulates_elapsed() {
    let clock = running_since(0, 600)
        .pause(at(100))
        .start(at(200))
        .pause(at(250));
    assert_eq!(clock.elapsed_seconds(), 150);
}

#[test]
fn start_after_expiry_restarts_from_zero() {
    let expired = running_since(0, 60).pause(at(90));
    assert_eq!(expired.elapsed_seconds(), 90);
    let restarted = expired.start(at(100));
    assert_eq!(restarted.elapsed_seconds(), 0);
    assert_eq!(restarted.remaining(at(100)), 60);
}

#[test]
fn reset_zeroes_and_optionally_changes_duration() {
    let clock = running_since(0, 600);
    let reset = clock.reset(None).unwrap();
    assert_eq!(reset, ClockSnapshot::scheduled(600));
    let longer = clock.reset(Some(900)).unwrap();
    assert_eq!(longer.duration_seconds(), 900);
    assert_eq!(longer.status(), MatchStatus::Scheduled);
}

#[test]
fn finish_pauses_and_is_terminal() {
    let finished = running_since(0, 600).finish(at(321));
    assert_eq!(finished.status(), MatchStatus::Finished);
    assert_eq!(finished.elapsed_seconds(), 321);
    assert!(!finished.is_running());
    assert_eq!(finished.started_at(), None);

    assert_eq!(finished.finish(at(400)), finished);
    assert_eq!(finished.start(at(400)), finished);
    assert_eq!(finished.pause(at(400)), finished);
    assert_eq!(finished.reset(Some(600)), None);
}

#[test]
fn auto_finish_only_when_expired() {
    let clock = running_since(0, 600);
    assert_eq!(clock.auto_finish(at(599), AUTO_FINISH_GRACE), None);
    let finished = clock.auto_finish(at(600), AUTO_FINISH_GRACE).unwrap();
    assert_eq!(finished.status(), MatchStatus::Finished);
    assert_eq!(finished.elapsed_seconds(), 600);
}

#[test]
fn auto_finish_respects_grace_window() {
    // A clock resumed with 1s left expires before the grace window has passed.
    let clock = running_since(0, 10).pause(at(9)).start(at(100));
    assert_eq!(clock.remaining(at(101)), 0);
    assert_eq!(clock.auto_finish(at(101), AUTO_FINISH_GRACE), None);
    assert!(clock.auto_finish(at_ms(101_500), AUTO_FINISH_GRACE).is_some());
    assert!(clock
        .auto_finish(at(101), Duration::from_millis(500))
        .is_some());
}

#[test]
fn auto_finish_ignores_paused_clock() {
    let clock = running_since(0, 10).pause(at(20));
    assert_eq!(clock.remaining(at(30)), 0);
    assert_eq!(clock.auto_finish(at(30), AUTO_FINISH_GRACE), None);
}

#[test]
fn view_formats_remaining_and_minute() {
    let clock = running_since(0, 600);
    let view = clock.view(at(125));
    assert_eq!(view.remaining_seconds, 475);
    assert_eq!(view.display, "07:55");
    assert_eq!(view.minute, 2);
    assert_eq!(view.phase, ClockPhase::Running);
    assert_eq!(format_mm_ss(0), "00:00");
    assert_eq!(format_mm_ss(5400), "90:00");
}

#[test]
fn snapshot_uses_store_column_names() {
    let clock = running_since(0, 600);
    let json = serde_json::to_value(&clock).unwrap();
    assert_eq!(json["duration_seconds"], 600);
    assert_eq!(json["elapsed_seconds"], 0);
    assert_eq!(json["is_running"], true);
    assert_eq!(json["status"], "live");
    assert!(json["last_started_at"].is_string());

    let back: ClockSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, clock);
}

proptest! {
    #[test]
    fn remaining_plus_elapsed_is_duration(
        duration in 1u32..7200,
        elapsed_before in 0i64..3600,
        running_for in 0i64..7200,
    ) {
        let clock = running_since(0, duration)
            .pause(at(elapsed_before))
            .start(at(elapsed_before + 10));
        let now = at(elapsed_before + 10 + running_for);
        let live = clock.live_elapsed(now);
        if live <= duration {
            prop_assert_eq!(clock.remaining(now) + live, duration);
        } else {
            prop_assert_eq!(clock.remaining(now), 0);
        }
    }

    #[test]
    fn pause_is_idempotent(run in 0i64..5000, later in 0i64..5000) {
        let once = running_since(0, 600).pause(at(run));
        prop_assert_eq!(once.pause(at(run + later)), once.clone());
    }
}
