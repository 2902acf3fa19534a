//! Source of "now" for clock computations.

use chrono::{DateTime, Utc};

/// Wall clock used by services and reconcilers. Tests substitute their own.
pub trait WallClock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
