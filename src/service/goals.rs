//! Goal recording and undo, with the minute stamped from the live clock.

use crate::models::{
    minute_stamp, Goal, GoalError, MatchId, MatchPatch, MatchRow, NewGoal, PlayerId, Side,
    TeamId, UndoOutcome,
};
use crate::store::{GoalStore, MatchStore};
use crate::wall_clock::{SystemClock, WallClock};
use std::sync::Arc;

/// Scorer's desk for one store.
pub struct GoalDesk<S> {
    store: Arc<S>,
    clock: Arc<dyn WallClock>,
}

impl<S: MatchStore + GoalStore> GoalDesk<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn WallClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Match row if `team_id` may still score in it.
    async fn open_match(&self, match_id: MatchId, team_id: TeamId) -> Result<MatchRow, GoalError> {
        let row = self.store.fetch_match(match_id).await?;
        if row.clock.is_finished() {
            return Err(GoalError::MatchFinished);
        }
        if row.side_of(team_id).is_none() {
            return Err(GoalError::TeamNotInMatch(team_id));
        }
        Ok(row)
    }

    /// Append a goal for `team_id`, stamped with the current minute of play.
    pub async fn record_goal(
        &self,
        match_id: MatchId,
        team_id: TeamId,
        player_id: Option<PlayerId>,
    ) -> Result<Goal, GoalError> {
        let row = self.open_match(match_id, team_id).await?;
        let remaining = row.clock.remaining(self.clock.now());
        let minute = minute_stamp(row.clock.duration_seconds(), remaining);
        let goal = self
            .store
            .append_goal(NewGoal {
                match_id,
                team_id,
                player_id,
                minute,
            })
            .await?;
        self.sync_score(&row).await?;
        log::info!("Goal for {} in match {} ({}')", team_id, match_id, minute);
        Ok(goal)
    }

    /// Quick "+1" without a scorer.
    pub async fn quick_plus(&self, match_id: MatchId, team_id: TeamId) -> Result<Goal, GoalError> {
        self.record_goal(match_id, team_id, None).await
    }

    /// Quick "-1": remove the team's most recent goal. Nothing changes if it has none.
    pub async fn quick_minus(
        &self,
        match_id: MatchId,
        team_id: TeamId,
    ) -> Result<UndoOutcome, GoalError> {
        let row = self.open_match(match_id, team_id).await?;
        match self.store.remove_last_goal(match_id, team_id).await? {
            Some(goal) => {
                self.sync_score(&row).await?;
                log::info!("Goal {} removed from match {}", goal.id, match_id);
                Ok(UndoOutcome::Removed(goal))
            }
            None => Ok(UndoOutcome::NothingToUndo),
        }
    }

    pub async fn goals(&self, match_id: MatchId) -> Result<Vec<Goal>, GoalError> {
        Ok(self.store.list_goals(match_id).await?)
    }

    /// Recount the score from the goal list.
    async fn sync_score(&self, row: &MatchRow) -> Result<MatchRow, GoalError> {
        let goals = self.store.list_goals(row.id).await?;
        let count = |side| {
            goals
                .iter()
                .filter(|g| row.side_of(g.team_id) == Some(side))
                .count() as u32
        };
        let patch = MatchPatch::score(count(Side::A), count(Side::B));
        Ok(self.store.patch_match(row.id, patch).await?)
    }
}
