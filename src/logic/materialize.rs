//! Group materialization: fill the chosen group sizes with concrete teams.

use crate::models::{group_label, Group, GroupSize, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `team_ids` once (Fisher-Yates) and slice them into groups in grouping order.
///
/// Labels are assigned A, B, C, ... in generation order. Pass a seeded `rng` for a
/// reproducible draw.
pub fn materialize_groups<R: Rng + ?Sized>(
    team_ids: &[TeamId],
    grouping: &[GroupSize],
    rng: &mut R,
) -> Vec<Group> {
    let mut shuffled = team_ids.to_vec();
    shuffled.shuffle(rng);

    let mut groups = Vec::new();
    let mut remaining = shuffled.as_slice();
    for &GroupSize { size, count } in grouping {
        for _ in 0..count {
            let take = size.min(remaining.len());
            let (teams, rest) = remaining.split_at(take);
            groups.push(Group {
                label: group_label(groups.len()),
                teams: teams.to_vec(),
            });
            remaining = rest;
        }
    }
    groups
}
