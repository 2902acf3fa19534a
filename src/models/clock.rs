//! Match clock snapshot: the persisted (duration, elapsed, running, started-at, status) tuple.
//!
//! Remaining time is never stored. Every reader derives it from the snapshot and its own
//! wall clock, so any number of viewers can display the same countdown without a shared
//! ticking clock. The lifecycle methods are the only way to produce a new snapshot; each
//! takes `&self` and returns the next value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default match length when none is configured (10 minutes).
pub const DEFAULT_DURATION_SECONDS: u32 = 600;

/// Minimum time since `started_at` before an expired clock may be auto-finished.
/// Guards against a viewer seeing `remaining == 0` right after a start because of clock jitter.
pub const AUTO_FINISH_GRACE: Duration = Duration::from_millis(1500);

/// Lifecycle status stored with the match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Live,
    Finished,
}

/// What a viewer should show. Paused is not stored: it is `Live` while not running.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPhase {
    Scheduled,
    Running,
    Paused,
    Finished,
}

/// Persisted clock state of one match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    #[serde(rename = "duration_seconds")]
    duration: u32,
    /// Seconds accumulated up to the last pause (excludes the running delta).
    #[serde(rename = "elapsed_seconds")]
    elapsed: u32,
    is_running: bool,
    /// Set iff `is_running`.
    #[serde(rename = "last_started_at", default)]
    started_at: Option<DateTime<Utc>>,
    status: MatchStatus,
}

impl Default for ClockSnapshot {
    fn default() -> Self {
        Self::scheduled(DEFAULT_DURATION_SECONDS)
    }
}

/// Whole seconds from `from` to `to`, floored. Negative spans (skewed clocks) count as zero.
fn whole_seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let ms = (to - from).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        u32::try_from(ms / 1000).unwrap_or(u32::MAX)
    }
}

impl ClockSnapshot {
    /// A fresh clock as produced by the draw: not started, nothing elapsed.
    pub fn scheduled(duration_seconds: u32) -> Self {
        Self {
            duration: duration_seconds,
            elapsed: 0,
            is_running: false,
            started_at: None,
            status: MatchStatus::Scheduled,
        }
    }

    pub fn duration_seconds(&self) -> u32 {
        self.duration
    }

    /// Stored elapsed seconds, without the in-progress running delta.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Seconds since the last start, or 0 when not running.
    fn running_delta(&self, now: DateTime<Utc>) -> u32 {
        match (self.is_running, self.started_at) {
            (true, Some(started)) => whole_seconds_between(started, now),
            _ => 0,
        }
    }

    /// Elapsed seconds including the running delta.
    pub fn live_elapsed(&self, now: DateTime<Utc>) -> u32 {
        self.elapsed.saturating_add(self.running_delta(now))
    }

    /// `max(0, duration - live_elapsed)`.
    pub fn remaining(&self, now: DateTime<Utc>) -> u32 {
        self.duration.saturating_sub(self.live_elapsed(now))
    }

    pub fn phase(&self) -> ClockPhase {
        match self.status {
            MatchStatus::Finished => ClockPhase::Finished,
            _ if self.is_running => ClockPhase::Running,
            MatchStatus::Live => ClockPhase::Paused,
            MatchStatus::Scheduled => ClockPhase::Scheduled,
        }
    }

    /// Start or resume the clock.
    ///
    /// No-op when already running or finished. An expired clock (`elapsed >= duration`)
    /// restarts from zero so it does not expire again immediately.
    pub fn start(&self, now: DateTime<Utc>) -> Self {
        if self.is_running || self.is_finished() {
            return self.clone();
        }
        let elapsed = if self.elapsed >= self.duration { 0 } else { self.elapsed };
        Self {
            duration: self.duration,
            elapsed,
            is_running: true,
            started_at: Some(now),
            status: MatchStatus::Live,
        }
    }

    /// Stop the clock, folding the running delta into `elapsed`. No-op when not running.
    pub fn pause(&self, now: DateTime<Utc>) -> Self {
        if !self.is_running {
            return self.clone();
        }
        Self {
            duration: self.duration,
            elapsed: self.live_elapsed(now),
            is_running: false,
            started_at: None,
            status: self.status,
        }
    }

    /// Back to a scheduled, zeroed clock, optionally with a new duration.
    /// Returns `None` for a finished match.
    pub fn reset(&self, new_duration: Option<u32>) -> Option<Self> {
        if self.is_finished() {
            return None;
        }
        Some(Self::scheduled(new_duration.unwrap_or(self.duration)))
    }

    /// Pause (if running) and mark finished. Idempotent once finished.
    pub fn finish(&self, now: DateTime<Utc>) -> Self {
        if self.is_finished() {
            return self.clone();
        }
        Self {
            status: MatchStatus::Finished,
            ..self.pause(now)
        }
    }

    /// `finish` for an expired running clock, once at least `grace` has passed since the start.
    pub fn auto_finish(&self, now: DateTime<Utc>, grace: Duration) -> Option<Self> {
        let started = self.started_at?;
        if !self.is_running || self.remaining(now) > 0 {
            return None;
        }
        let since_start = (now - started).to_std().unwrap_or(Duration::ZERO);
        if since_start < grace {
            return None;
        }
        Some(self.finish(now))
    }

    /// Display values at `now`.
    pub fn view(&self, now: DateTime<Utc>) -> ClockView {
        ClockView::new(self.duration, self.remaining(now), self.phase())
    }
}

/// What a scoreboard renders for one match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClockView {
    pub remaining_seconds: u32,
    /// `MM:SS` of the remaining time.
    pub display: String,
    /// Minute of play, as stamped on goals.
    pub minute: u32,
    pub phase: ClockPhase,
}

impl ClockView {
    pub fn new(duration_seconds: u32, remaining_seconds: u32, phase: ClockPhase) -> Self {
        Self {
            remaining_seconds,
            display: format_mm_ss(remaining_seconds),
            minute: super::goal::minute_stamp(duration_seconds, remaining_seconds),
            phase,
        }
    }
}

/// `MM:SS`, minutes not capped at 59.
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
