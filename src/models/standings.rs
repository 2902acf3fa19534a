//! Group table rows.

use crate::models::game::TeamId;
use serde::{Deserialize, Serialize};

/// Points for a win.
pub const POINTS_WIN: u32 = 3;
/// Points for a draw.
pub const POINTS_DRAW: u32 = 1;

/// One team's line in its group table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: TeamId,
    pub group_label: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl StandingRow {
    pub fn new(team_id: TeamId, group_label: Option<String>) -> Self {
        Self {
            team_id,
            group_label,
            ..Self::default()
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Record one finished match from this team's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        if scored > conceded {
            self.wins += 1;
            self.points += POINTS_WIN;
        } else if scored == conceded {
            self.draws += 1;
            self.points += POINTS_DRAW;
        } else {
            self.losses += 1;
        }
    }
}
