//! "At most one running match per competition" check, run before a start.

use crate::models::{ClockError, MatchRow};
use crate::store::MatchStore;
use std::future::Future;
use std::sync::Arc;

/// Precondition for starting a match. Swap the implementation for a transactional check
/// (e.g. a conditional update) without touching the clock logic.
pub trait StartGuard: Send + Sync + 'static {
    /// `Ok(())` if `candidate` may start.
    fn check_can_start(
        &self,
        candidate: &MatchRow,
    ) -> impl Future<Output = Result<(), ClockError>> + Send;
}

/// Read-then-write guard: list the competition's matches and refuse if another one runs.
///
/// Two near-simultaneous starts can both pass the read; the last write wins in the store.
pub struct SameSportGuard<S> {
    store: Arc<S>,
}

impl<S> SameSportGuard<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: MatchStore> StartGuard for SameSportGuard<S> {
    async fn check_can_start(&self, candidate: &MatchRow) -> Result<(), ClockError> {
        let matches = self.store.list_matches(candidate.sport_id).await?;
        match matches
            .iter()
            .find(|m| m.clock.is_running() && m.id != candidate.id)
        {
            Some(running) => Err(ClockError::LiveMatchInProgress {
                sport_id: candidate.sport_id,
                running: running.id,
            }),
            None => Ok(()),
        }
    }
}

/// Allows every start.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGuard;

impl StartGuard for NoGuard {
    async fn check_can_start(&self, _candidate: &MatchRow) -> Result<(), ClockError> {
        Ok(())
    }
}
