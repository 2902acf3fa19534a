//! Goal events. Append-only per match; undo removes the most recent one of a team.

use crate::models::game::{MatchId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a goal.
pub type GoalId = Uuid;

/// Unique identifier for a player (roster CRUD lives outside this crate).
pub type PlayerId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub player_id: Option<PlayerId>,
    /// Minute of play when the goal was recorded.
    pub minute: u32,
    pub created_at: DateTime<Utc>,
}

/// A goal to append.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub match_id: MatchId,
    pub team_id: TeamId,
    pub player_id: Option<PlayerId>,
    pub minute: u32,
}

impl NewGoal {
    pub fn into_goal(self, created_at: DateTime<Utc>) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            match_id: self.match_id,
            team_id: self.team_id,
            player_id: self.player_id,
            minute: self.minute,
            created_at,
        }
    }
}

/// `floor((duration - remaining) / 60)`.
pub fn minute_stamp(duration_seconds: u32, remaining_seconds: u32) -> u32 {
    duration_seconds.saturating_sub(remaining_seconds) / 60
}

/// Result of undoing a team's last goal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UndoOutcome {
    Removed(Goal),
    /// The team has no goal in this match; nothing was changed.
    NothingToUndo,
}
