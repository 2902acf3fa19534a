//! Tournament business logic: grouping, round robins, the draw, standings.

mod draw;
mod grouping;
mod interleave;
mod materialize;
mod round_robin;
mod standings;

pub use draw::{generate_draw, Draw, DrawOptions, DEFAULT_SPACING_MINUTES};
pub use grouping::{grouping_team_count, select_grouping};
pub use interleave::{assign_start_times, back_to_back_repeats, interleave};
pub use materialize::materialize_groups;
pub use round_robin::{pair_count, rounds_for};
pub use standings::{compute_standings, top_scorer};
