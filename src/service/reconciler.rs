//! Per-viewer countdown kept in sync with the stored clock snapshot.
//!
//! Each open match view runs one reconciler task. It ticks a local display once a second while
//! the snapshot says running, replaces the snapshot wholesale on every change notification,
//! and finishes the match itself when the countdown runs out.

use crate::models::{ClockError, ClockSnapshot, ClockView, MatchId, StoreError};
use crate::service::control::MatchControl;
use crate::service::guard::StartGuard;
use crate::store::{ChangeFilter, MatchStore, Subscription};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Local display tick.
pub const TICK: Duration = Duration::from_secs(1);

/// Events surfaced to the viewer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClockNotice {
    /// The match moved to finished. `automatic` is true when this viewer finished it on expiry.
    MatchFinished { match_id: MatchId, automatic: bool },
}

/// Viewer side of a running reconciler. Dropping it stops the task.
pub struct ReconcilerHandle {
    match_id: MatchId,
    view: watch::Receiver<ClockView>,
    notices: mpsc::UnboundedReceiver<ClockNotice>,
    optimistic: mpsc::UnboundedSender<ClockSnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ReconcilerHandle {
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Current display values.
    pub fn view(&self) -> ClockView {
        self.view.borrow().clone()
    }

    /// Receiver that changes whenever the display does.
    pub fn watch(&self) -> watch::Receiver<ClockView> {
        self.view.clone()
    }

    pub async fn next_notice(&mut self) -> Option<ClockNotice> {
        self.notices.recv().await
    }

    pub fn try_notice(&mut self) -> Option<ClockNotice> {
        self.notices.try_recv().ok()
    }

    /// Show `snapshot` right away (e.g. after pressing start) until the store confirms.
    /// The next authoritative snapshot replaces it.
    pub fn show_optimistic(&self, snapshot: ClockSnapshot) {
        let _ = self.optimistic.send(snapshot);
    }

    /// The task has stopped (closed, or its match was deleted).
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop ticking and unsubscribe.
    pub async fn close(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

/// Reconciler task for one match.
pub struct Reconciler<S, G> {
    control: Arc<MatchControl<S, G>>,
    match_id: MatchId,
    snapshot: ClockSnapshot,
    remaining: u32,
    /// Local optimistic state not yet confirmed by the store.
    provisional: bool,
    view: watch::Sender<ClockView>,
    notices: mpsc::UnboundedSender<ClockNotice>,
    ticker: Interval,
}

fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

impl<S: MatchStore, G: StartGuard> Reconciler<S, G> {
    /// Subscribe to `match_id`, load its snapshot and start the display task.
    pub async fn spawn(
        control: Arc<MatchControl<S, G>>,
        match_id: MatchId,
    ) -> Result<ReconcilerHandle, ClockError> {
        // Subscribe first so a change between the fetch and the loop is not lost.
        let updates = control.store().subscribe(ChangeFilter::Match(match_id));
        let row = control.store().fetch_match(match_id).await?;
        let now = control.wall_clock().now();

        let (view_tx, view_rx) = watch::channel(row.clock.view(now));
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (optimistic_tx, optimistic_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let reconciler = Reconciler {
            control,
            match_id,
            remaining: row.clock.remaining(now),
            snapshot: row.clock,
            provisional: false,
            view: view_tx,
            notices: notice_tx,
            ticker: new_ticker(),
        };
        let task = tokio::spawn(reconciler.run(updates, optimistic_rx, shutdown_rx));

        Ok(ReconcilerHandle {
            match_id,
            view: view_rx,
            notices: notice_rx,
            optimistic: optimistic_tx,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    async fn run(
        mut self,
        mut updates: Subscription,
        mut optimistic: mpsc::UnboundedReceiver<ClockSnapshot>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                change = updates.next() => {
                    if change.is_none() {
                        break;
                    }
                    match self.control.store().fetch_match(self.match_id).await {
                        Ok(row) => self.adopt(row.clock, false),
                        Err(StoreError::MatchNotFound(_)) => {
                            log::info!("Match {} deleted, closing its clock view", self.match_id);
                            break;
                        }
                        // Keep counting locally; the next notification re-syncs.
                        Err(e) => {
                            log::warn!("Clock sync for match {} failed: {}", self.match_id, e)
                        }
                    }
                }
                Some(snapshot) = optimistic.recv() => self.adopt(snapshot, true),
                _ = self.ticker.tick(), if self.snapshot.is_running() => {
                    self.remaining = self.remaining.saturating_sub(1);
                    log::debug!("Match {} tick, {}s left", self.match_id, self.remaining);
                    self.publish();
                }
            }

            if self.snapshot.is_running() && self.remaining == 0 && !self.provisional {
                self.try_auto_finish().await;
            }
        }
        log::debug!("Clock view for match {} closed", self.match_id);
    }

    /// Replace the snapshot, re-derive the countdown and restart the ticker.
    fn adopt(&mut self, snapshot: ClockSnapshot, provisional: bool) {
        let was_finished = self.snapshot.is_finished();
        let now = self.control.wall_clock().now();
        self.remaining = snapshot.remaining(now);
        self.snapshot = snapshot;
        self.provisional = provisional;
        self.ticker = new_ticker();
        self.publish();
        if !provisional && !was_finished && self.snapshot.is_finished() {
            self.notify_finished(false);
        }
    }

    async fn try_auto_finish(&mut self) {
        match self.control.auto_finish(self.match_id).await {
            Ok(Some(row)) => {
                // Marks the transition as ours before adopt sees it.
                self.notify_finished(true);
                self.snapshot = row.clock.clone();
                self.adopt(row.clock, false);
            }
            // Not expired in the store's view yet, or inside the grace window; retry next tick.
            Ok(None) => {}
            Err(e) => log::warn!("Auto-finish of match {} failed: {}", self.match_id, e),
        }
    }

    fn notify_finished(&self, automatic: bool) {
        let _ = self.notices.send(ClockNotice::MatchFinished {
            match_id: self.match_id,
            automatic,
        });
    }

    fn publish(&self) {
        self.view.send_replace(ClockView::new(
            self.snapshot.duration_seconds(),
            self.remaining,
            self.snapshot.phase(),
        ));
    }
}
