//! Data structures for the tournament: matches, clock snapshots, fixtures, goals, standings.

mod clock;
mod error;
mod fixture;
mod game;
mod goal;
mod standings;

pub use clock::{
    format_mm_ss, ClockPhase, ClockSnapshot, ClockView, MatchStatus, AUTO_FINISH_GRACE,
    DEFAULT_DURATION_SECONDS,
};
pub use error::{ClockError, DrawError, GoalError, StoreError};
pub use fixture::{
    group_label, Fixture, Group, GroupSize, Grouping, Pair, Round, MAX_GROUP_SIZE,
    MIN_GROUP_SIZE,
};
pub use game::{MatchId, MatchPatch, MatchRow, NewMatch, Side, SportId, TeamId};
pub use goal::{minute_stamp, Goal, GoalId, NewGoal, PlayerId, UndoOutcome};
pub use standings::{StandingRow, POINTS_DRAW, POINTS_WIN};
