//! Group tables computed from a competition's match rows.

use crate::models::{Goal, MatchRow, MatchStatus, PlayerId, StandingRow};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Tables for every team that appears in `matches`; only finished matches score.
///
/// Sorted by group label, then points, goal difference and goals scored (all descending).
pub fn compute_standings(matches: &[MatchRow]) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = Vec::new();
    let mut index = HashMap::new();

    for m in matches {
        for team in [m.team_a_id, m.team_b_id] {
            index.entry(team).or_insert_with(|| {
                rows.push(StandingRow::new(team, m.group_label.clone()));
                rows.len() - 1
            });
        }
        if m.clock.status() != MatchStatus::Finished {
            continue;
        }
        rows[index[&m.team_a_id]].record(m.score_a, m.score_b);
        rows[index[&m.team_b_id]].record(m.score_b, m.score_a);
    }

    rows.sort_by_key(|r| {
        (
            r.group_label.clone(),
            Reverse(r.points),
            Reverse(r.goal_difference()),
            Reverse(r.goals_for),
        )
    });
    rows
}

/// Player with the most goals; on a tie, the one who scored first. Goals without a scorer
/// are ignored.
pub fn top_scorer(goals: &[Goal]) -> Option<(PlayerId, u32)> {
    // (player, count) in order of each player's first goal.
    let mut tally: Vec<(PlayerId, u32)> = Vec::new();
    let mut index: HashMap<PlayerId, usize> = HashMap::new();
    for player in goals.iter().filter_map(|g| g.player_id) {
        let i = *index.entry(player).or_insert_with(|| {
            tally.push((player, 0));
            tally.len() - 1
        });
        tally[i].1 += 1;
    }
    tally
        .into_iter()
        .fold(None, |best, (player, count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((player, count)),
        })
}
