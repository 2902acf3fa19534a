//! Tournament draw: teams in, ordered match rows out.

use crate::logic::grouping::select_grouping;
use crate::logic::interleave::{assign_start_times, interleave};
use crate::logic::materialize::materialize_groups;
use crate::models::{
    DrawError, Group, Grouping, NewMatch, SportId, TeamId, DEFAULT_DURATION_SECONDS,
    MIN_GROUP_SIZE,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default minutes between consecutive kick-offs.
pub const DEFAULT_SPACING_MINUTES: u32 = 20;

/// Caller choices for a draw.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawOptions {
    /// Kick-off of the first match; without it no start times are assigned.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default = "default_spacing_minutes")]
    pub spacing_minutes: u32,
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
}

fn default_spacing_minutes() -> u32 {
    DEFAULT_SPACING_MINUTES
}

fn default_duration_seconds() -> u32 {
    DEFAULT_DURATION_SECONDS
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            start_time: None,
            spacing_minutes: DEFAULT_SPACING_MINUTES,
            duration_seconds: DEFAULT_DURATION_SECONDS,
        }
    }
}

/// Everything a draw produced: the plan, the groups and the rows to insert.
#[derive(Clone, Debug, Serialize)]
pub struct Draw {
    pub grouping: Grouping,
    pub groups: Vec<Group>,
    pub matches: Vec<NewMatch>,
}

/// Run the full draw for one competition.
///
/// 1. Validate the team list (at least 3, no duplicates). Nothing is produced on error.
/// 2. Pick group sizes, shuffle the teams into groups.
/// 3. Interleave the groups' round robins and assign start times.
pub fn generate_draw<R: Rng + ?Sized>(
    sport_id: SportId,
    team_ids: &[TeamId],
    options: &DrawOptions,
    rng: &mut R,
) -> Result<Draw, DrawError> {
    if team_ids.len() < MIN_GROUP_SIZE {
        return Err(DrawError::NotEnoughTeams {
            count: team_ids.len(),
        });
    }
    let mut seen = HashSet::with_capacity(team_ids.len());
    if let Some(dup) = team_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(DrawError::DuplicateTeam(*dup));
    }

    let grouping = select_grouping(team_ids.len());
    let groups = materialize_groups(team_ids, &grouping, rng);
    let fixtures = interleave(&groups);
    let start_times = assign_start_times(&fixtures, options.start_time, options.spacing_minutes);

    let matches: Vec<NewMatch> = fixtures
        .into_iter()
        .zip(start_times)
        .map(|(fixture, start)| {
            NewMatch::from_fixture(sport_id, fixture, start, options.duration_seconds)
        })
        .collect();

    log::info!(
        "Drew {} teams into {} group(s), {} matches",
        team_ids.len(),
        groups.len(),
        matches.len()
    );

    Ok(Draw {
        grouping,
        groups,
        matches,
    })
}
