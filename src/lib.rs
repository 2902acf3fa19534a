//! Event-day sports tournament manager: library with models, draw logic and match clock services.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;
pub mod wall_clock;

pub use config::Config;
pub use logic::{
    assign_start_times, back_to_back_repeats, compute_standings, generate_draw, interleave,
    materialize_groups, pair_count, rounds_for, select_grouping, top_scorer, Draw, DrawOptions,
};
pub use models::{
    minute_stamp, ClockError, ClockPhase, ClockSnapshot, ClockView, DrawError, Fixture, Goal,
    GoalError, Group, GroupSize, Grouping, MatchId, MatchPatch, MatchRow, MatchStatus, NewGoal,
    NewMatch, PlayerId, Side, SportId, StandingRow, StoreError, TeamId, UndoOutcome,
    AUTO_FINISH_GRACE, DEFAULT_DURATION_SECONDS,
};
pub use service::{
    ClockNotice, GoalDesk, MatchControl, NoGuard, Reconciler, ReconcilerHandle, SameSportGuard,
    StartGuard,
};
pub use store::{ChangeFilter, ChangeKind, GoalStore, InMemoryStore, MatchChange, MatchStore};
pub use wall_clock::{SystemClock, WallClock};
