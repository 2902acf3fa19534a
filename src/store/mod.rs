//! Boundary to the external data store: match rows, goals, change notifications.
//!
//! The store is the single source of truth. Services read from it, compute the next state
//! with the pure functions in `models`/`logic`, and write it back as one patch.

mod memory;

pub use memory::InMemoryStore;

use crate::models::{
    Goal, MatchId, MatchPatch, MatchRow, NewGoal, NewMatch, SportId, StoreError, TeamId,
};
use serde::Serialize;
use std::future::Future;
use tokio::sync::broadcast;

/// Match rows: read, patch, bulk insert, wipe, subscribe.
pub trait MatchStore: Send + Sync + 'static {
    fn fetch_match(&self, id: MatchId)
        -> impl Future<Output = Result<MatchRow, StoreError>> + Send;

    /// All matches of a competition ordered by start time (unscheduled last, then insert order).
    fn list_matches(
        &self,
        sport_id: SportId,
    ) -> impl Future<Output = Result<Vec<MatchRow>, StoreError>> + Send;

    /// Apply `patch` atomically and return the stored row.
    fn patch_match(
        &self,
        id: MatchId,
        patch: MatchPatch,
    ) -> impl Future<Output = Result<MatchRow, StoreError>> + Send;

    /// One-shot insert of a drawn schedule.
    fn insert_matches(
        &self,
        matches: Vec<NewMatch>,
    ) -> impl Future<Output = Result<Vec<MatchRow>, StoreError>> + Send;

    /// Delete every match (and its goals) of a competition. Returns the number of matches removed.
    fn delete_matches(
        &self,
        sport_id: SportId,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send;

    fn subscribe(&self, filter: ChangeFilter) -> Subscription;
}

/// Goal rows: append, undo, list.
pub trait GoalStore: Send + Sync + 'static {
    fn append_goal(&self, goal: NewGoal) -> impl Future<Output = Result<Goal, StoreError>> + Send;

    /// Remove the most recently created goal of `team_id` in `match_id`, if any.
    fn remove_last_goal(
        &self,
        match_id: MatchId,
        team_id: TeamId,
    ) -> impl Future<Output = Result<Option<Goal>, StoreError>> + Send;

    /// Goals of a match in creation order.
    fn list_goals(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<Vec<Goal>, StoreError>> + Send;

    /// Goals of every match of a competition, in creation order.
    fn list_sport_goals(
        &self,
        sport_id: SportId,
    ) -> impl Future<Output = Result<Vec<Goal>, StoreError>> + Send;
}

/// What changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
    Goals,
    /// Notifications were lost; re-fetch everything of interest.
    Resync,
}

/// "Something changed" signal, optionally carrying the changed row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchChange {
    pub kind: ChangeKind,
    pub sport_id: Option<SportId>,
    pub match_id: Option<MatchId>,
    pub row: Option<MatchRow>,
}

impl MatchChange {
    fn resync() -> Self {
        Self {
            kind: ChangeKind::Resync,
            sport_id: None,
            match_id: None,
            row: None,
        }
    }
}

/// Which changes a subscriber wants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeFilter {
    All,
    Sport(SportId),
    Match(MatchId),
}

impl ChangeFilter {
    pub fn matches(&self, change: &MatchChange) -> bool {
        match (self, change.kind) {
            (_, ChangeKind::Resync) | (ChangeFilter::All, _) => true,
            (ChangeFilter::Sport(id), _) => change.sport_id == Some(*id),
            (ChangeFilter::Match(id), _) => change.match_id == Some(*id),
        }
    }
}

/// Filtered stream of change notifications.
pub struct Subscription {
    filter: ChangeFilter,
    rx: broadcast::Receiver<MatchChange>,
}

impl Subscription {
    pub fn new(filter: ChangeFilter, rx: broadcast::Receiver<MatchChange>) -> Self {
        Self { filter, rx }
    }

    /// Next matching change. A lagged receiver yields a `Resync` change instead of failing.
    /// Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<MatchChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) if self.filter.matches(&change) => return Some(change),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    log::warn!("Subscriber lagged, {} notification(s) dropped", missed);
                    return Some(MatchChange::resync());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
