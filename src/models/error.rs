//! Error types for the draw, the match clock, goals and the store boundary.

use crate::models::{MatchId, SportId, TeamId};
use thiserror::Error;

/// Failures reported by the external store. Services pass these through unchanged.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Write rejected by store: {0}")]
    Rejected(String),
}

/// Draw validation failures. Raised before anything is written.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum DrawError {
    /// Fewer than 3 teams: a group stage is not possible.
    #[error("Need at least 3 teams for a group stage (have {count})")]
    NotEnoughTeams { count: usize },
    /// The same team was submitted twice.
    #[error("Team {0} appears more than once")]
    DuplicateTeam(TeamId),
}

/// Rejected match clock operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ClockError {
    #[error("This match is already finished")]
    AlreadyFinished,
    /// Another match of the same competition is running.
    #[error("Tournament already has a live match ({running})")]
    LiveMatchInProgress { sport_id: SportId, running: MatchId },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Rejected goal operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GoalError {
    #[error("Cannot change the score of a finished match")]
    MatchFinished,
    #[error("Team {0} does not play in this match")]
    TeamNotInMatch(TeamId),
    #[error(transparent)]
    Store(#[from] StoreError),
}
