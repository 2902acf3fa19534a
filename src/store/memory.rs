//! In-process store backing the web server and the tests.

use super::{ChangeFilter, ChangeKind, GoalStore, MatchChange, MatchStore, Subscription};
use crate::models::{
    Goal, MatchId, MatchPatch, MatchRow, NewGoal, NewMatch, SportId, StoreError, TeamId,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Buffered notifications per subscriber before it lags.
const CHANGE_BUFFER: usize = 256;

#[derive(Default)]
struct Tables {
    matches: HashMap<MatchId, MatchRow>,
    /// Insert order of matches, used as the tiebreak when listing.
    order: Vec<MatchId>,
    /// Creation order.
    goals: Vec<Goal>,
}

/// Tables behind a `RwLock` plus a broadcast channel of changes.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    changes: broadcast::Sender<MatchChange>,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            tables: RwLock::new(Tables::default()),
            changes,
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every call fails with `StoreError::Unavailable` while false.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store offline".to_string()))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("lock error".to_string()))
    }

    fn notify(&self, kind: ChangeKind, row: &MatchRow) {
        // No subscribers is fine.
        let _ = self.changes.send(MatchChange {
            kind,
            sport_id: Some(row.sport_id),
            match_id: Some(row.id),
            row: Some(row.clone()),
        });
    }
}

impl MatchStore for InMemoryStore {
    async fn fetch_match(&self, id: MatchId) -> Result<MatchRow, StoreError> {
        self.read()?
            .matches
            .get(&id)
            .cloned()
            .ok_or(StoreError::MatchNotFound(id))
    }

    async fn list_matches(&self, sport_id: SportId) -> Result<Vec<MatchRow>, StoreError> {
        let tables = self.read()?;
        let mut rows: Vec<(usize, MatchRow)> = tables
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| tables.matches.get(id).map(|m| (i, m.clone())))
            .filter(|(_, m)| m.sport_id == sport_id)
            .collect();
        rows.sort_by_key(|(i, m)| (m.start_time.is_none(), m.start_time, *i));
        Ok(rows.into_iter().map(|(_, m)| m).collect())
    }

    async fn patch_match(&self, id: MatchId, patch: MatchPatch) -> Result<MatchRow, StoreError> {
        let row = {
            let mut tables = self.write()?;
            let row = tables
                .matches
                .get_mut(&id)
                .ok_or(StoreError::MatchNotFound(id))?;
            patch.apply_to(row);
            row.clone()
        };
        self.notify(ChangeKind::Updated, &row);
        Ok(row)
    }

    async fn insert_matches(&self, matches: Vec<NewMatch>) -> Result<Vec<MatchRow>, StoreError> {
        if let Some(m) = matches.iter().find(|m| m.team_a_id == m.team_b_id) {
            return Err(StoreError::Rejected(format!(
                "team {} cannot play itself",
                m.team_a_id
            )));
        }
        let rows: Vec<MatchRow> = matches.into_iter().map(NewMatch::into_row).collect();
        {
            let mut tables = self.write()?;
            for row in &rows {
                tables.order.push(row.id);
                tables.matches.insert(row.id, row.clone());
            }
        }
        for row in &rows {
            self.notify(ChangeKind::Inserted, row);
        }
        Ok(rows)
    }

    async fn delete_matches(&self, sport_id: SportId) -> Result<usize, StoreError> {
        let removed: Vec<MatchRow> = {
            let mut tables = self.write()?;
            let ids: Vec<MatchId> = tables
                .matches
                .values()
                .filter(|m| m.sport_id == sport_id)
                .map(|m| m.id)
                .collect();
            let removed: Vec<MatchRow> = ids
                .iter()
                .filter_map(|id| tables.matches.remove(id))
                .collect();
            tables.order.retain(|id| !ids.contains(id));
            tables.goals.retain(|g| !ids.contains(&g.match_id));
            removed
        };
        for row in &removed {
            self.notify(ChangeKind::Deleted, row);
        }
        Ok(removed.len())
    }

    fn subscribe(&self, filter: ChangeFilter) -> Subscription {
        Subscription::new(filter, self.changes.subscribe())
    }
}

impl GoalStore for InMemoryStore {
    async fn append_goal(&self, goal: NewGoal) -> Result<Goal, StoreError> {
        let (goal, row) = {
            let mut tables = self.write()?;
            let row = tables
                .matches
                .get(&goal.match_id)
                .cloned()
                .ok_or(StoreError::MatchNotFound(goal.match_id))?;
            let goal = goal.into_goal(Utc::now());
            tables.goals.push(goal.clone());
            (goal, row)
        };
        self.notify(ChangeKind::Goals, &row);
        Ok(goal)
    }

    async fn remove_last_goal(
        &self,
        match_id: MatchId,
        team_id: TeamId,
    ) -> Result<Option<Goal>, StoreError> {
        let (removed, row) = {
            let mut tables = self.write()?;
            let pos = tables
                .goals
                .iter()
                .rposition(|g| g.match_id == match_id && g.team_id == team_id);
            let removed = pos.map(|i| tables.goals.remove(i));
            (removed, tables.matches.get(&match_id).cloned())
        };
        if let (Some(_), Some(row)) = (&removed, &row) {
            self.notify(ChangeKind::Goals, row);
        }
        Ok(removed)
    }

    async fn list_goals(&self, match_id: MatchId) -> Result<Vec<Goal>, StoreError> {
        Ok(self
            .read()?
            .goals
            .iter()
            .filter(|g| g.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn list_sport_goals(&self, sport_id: SportId) -> Result<Vec<Goal>, StoreError> {
        let tables = self.read()?;
        Ok(tables
            .goals
            .iter()
            .filter(|g| {
                tables
                    .matches
                    .get(&g.match_id)
                    .is_some_and(|m| m.sport_id == sport_id)
            })
            .cloned()
            .collect())
    }
}
