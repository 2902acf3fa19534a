//! Match rows as read from and written to the store.

use crate::models::clock::ClockSnapshot;
use crate::models::fixture::Fixture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a competition (one sport's tournament).
pub type SportId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// A scheduled match with its score and clock.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub id: MatchId,
    pub sport_id: SportId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    #[serde(default)]
    pub score_a: u32,
    #[serde(default)]
    pub score_b: u32,
    pub start_time: Option<DateTime<Utc>>,
    /// Human round label, e.g. "Group A – R2".
    pub round: Option<String>,
    pub group_label: Option<String>,
    #[serde(flatten)]
    pub clock: ClockSnapshot,
}

impl MatchRow {
    /// Which side `team` plays on, if it plays in this match at all.
    pub fn side_of(&self, team: TeamId) -> Option<Side> {
        if team == self.team_a_id {
            Some(Side::A)
        } else if team == self.team_b_id {
            Some(Side::B)
        } else {
            None
        }
    }
}

/// A match to be bulk-inserted, built from a drawn fixture.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub sport_id: SportId,
    pub team_a_id: TeamId,
    pub team_b_id: TeamId,
    pub start_time: Option<DateTime<Utc>>,
    pub round: Option<String>,
    pub group_label: Option<String>,
    #[serde(flatten)]
    pub clock: ClockSnapshot,
}

impl NewMatch {
    pub fn from_fixture(
        sport_id: SportId,
        fixture: Fixture,
        start_time: Option<DateTime<Utc>>,
        duration_seconds: u32,
    ) -> Self {
        Self {
            sport_id,
            team_a_id: fixture.team_a,
            team_b_id: fixture.team_b,
            start_time,
            round: Some(fixture.round_label),
            group_label: Some(fixture.group_label),
            clock: ClockSnapshot::scheduled(duration_seconds),
        }
    }

    /// Row as the store would persist it.
    pub fn into_row(self) -> MatchRow {
        MatchRow {
            id: Uuid::new_v4(),
            sport_id: self.sport_id,
            team_a_id: self.team_a_id,
            team_b_id: self.team_b_id,
            score_a: 0,
            score_b: 0,
            start_time: self.start_time,
            round: self.round,
            group_label: self.group_label,
            clock: self.clock,
        }
    }
}

/// Partial update applied atomically by the store.
///
/// The clock is only ever replaced whole, with a snapshot produced by a lifecycle method.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchPatch {
    pub clock: Option<ClockSnapshot>,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
}

impl MatchPatch {
    pub fn clock(snapshot: ClockSnapshot) -> Self {
        Self {
            clock: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn score(score_a: u32, score_b: u32) -> Self {
        Self {
            score_a: Some(score_a),
            score_b: Some(score_b),
            ..Self::default()
        }
    }

    pub fn apply_to(self, row: &mut MatchRow) {
        if let Some(clock) = self.clock {
            row.clock = clock;
        }
        if let Some(a) = self.score_a {
            row.score_a = a;
        }
        if let Some(b) = self.score_b {
            row.score_b = b;
        }
    }
}
