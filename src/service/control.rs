//! Match clock operations against the store: fetch, apply a lifecycle transition, patch.
//!
//! Store errors are returned unchanged and never retried here.

use crate::models::{ClockError, ClockSnapshot, MatchId, MatchPatch, MatchRow, AUTO_FINISH_GRACE};
use crate::service::guard::StartGuard;
use crate::store::MatchStore;
use crate::wall_clock::{SystemClock, WallClock};
use std::sync::Arc;
use std::time::Duration;

/// Operator-facing clock controls for the matches of one store.
pub struct MatchControl<S, G> {
    store: Arc<S>,
    guard: G,
    clock: Arc<dyn WallClock>,
    grace: Duration,
}

impl<S: MatchStore, G: StartGuard> MatchControl<S, G> {
    pub fn new(store: Arc<S>, guard: G) -> Self {
        Self {
            store,
            guard,
            clock: Arc::new(SystemClock),
            grace: AUTO_FINISH_GRACE,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn wall_clock(&self) -> &Arc<dyn WallClock> {
        &self.clock
    }

    /// Patch only when the transition changed something.
    async fn write_clock(
        &self,
        row: &MatchRow,
        next: ClockSnapshot,
    ) -> Result<MatchRow, ClockError> {
        if next == row.clock {
            return Ok(row.clone());
        }
        Ok(self.store.patch_match(row.id, MatchPatch::clock(next)).await?)
    }

    /// Start or resume. Refused for finished matches and while another match of the same
    /// competition runs; a running match is returned as is.
    pub async fn start(&self, id: MatchId) -> Result<MatchRow, ClockError> {
        let row = self.store.fetch_match(id).await?;
        if row.clock.is_finished() {
            log::warn!("Refusing to start finished match {}", id);
            return Err(ClockError::AlreadyFinished);
        }
        if row.clock.is_running() {
            return Ok(row);
        }
        if let Err(e) = self.guard.check_can_start(&row).await {
            log::warn!("Start of match {} rejected: {}", id, e);
            return Err(e);
        }
        let next = row.clock.start(self.clock.now());
        let stored = self.write_clock(&row, next).await?;
        log::info!("Match {} started", id);
        Ok(stored)
    }

    pub async fn pause(&self, id: MatchId) -> Result<MatchRow, ClockError> {
        let row = self.store.fetch_match(id).await?;
        let next = row.clock.pause(self.clock.now());
        let stored = self.write_clock(&row, next).await?;
        if row.clock.is_running() {
            log::info!(
                "Match {} paused at {}s",
                id,
                stored.clock.elapsed_seconds()
            );
        }
        Ok(stored)
    }

    /// Zero the clock, optionally with a new duration. Refused once finished.
    pub async fn reset(
        &self,
        id: MatchId,
        duration_seconds: Option<u32>,
    ) -> Result<MatchRow, ClockError> {
        let row = self.store.fetch_match(id).await?;
        let next = row
            .clock
            .reset(duration_seconds)
            .ok_or(ClockError::AlreadyFinished)?;
        let stored = self.write_clock(&row, next).await?;
        log::info!("Match {} reset ({}s)", id, stored.clock.duration_seconds());
        Ok(stored)
    }

    pub async fn finish(&self, id: MatchId) -> Result<MatchRow, ClockError> {
        let row = self.store.fetch_match(id).await?;
        let next = row.clock.finish(self.clock.now());
        let stored = self.write_clock(&row, next).await?;
        if !row.clock.is_finished() {
            log::info!("Match {} finished {}:{}", id, stored.score_a, stored.score_b);
        }
        Ok(stored)
    }

    /// Finish a running match whose time is up. `Ok(None)` if the stored snapshot is not
    /// expired, not running, or was started less than the grace window ago.
    pub async fn auto_finish(&self, id: MatchId) -> Result<Option<MatchRow>, ClockError> {
        let row = self.store.fetch_match(id).await?;
        match row.clock.auto_finish(self.clock.now(), self.grace) {
            Some(next) => {
                let stored = self.store.patch_match(id, MatchPatch::clock(next)).await?;
                log::info!("Match {} finished automatically", id);
                Ok(Some(stored))
            }
            None => Ok(None),
        }
    }
}
