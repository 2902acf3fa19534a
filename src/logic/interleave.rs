//! Fixture interleaving: merge the groups' round robins into one global order.

use crate::logic::round_robin::rounds_for;
use crate::models::{Fixture, Group, Pair, Round};
use chrono::{DateTime, Duration, Utc};

/// Per-group cursor into its remaining rounds.
struct GroupCursor<'a> {
    label: &'a str,
    rounds: Vec<Round>,
    round_index: usize,
}

impl GroupCursor<'_> {
    /// Take one pair from the current round, preferring one that shares no team with `last`.
    /// Falls back to the first pair of the round rather than stalling.
    fn take_avoiding(&mut self, last: Option<Pair>) -> Option<(Pair, usize)> {
        while let Some(round) = self.rounds.get_mut(self.round_index) {
            if round.is_empty() {
                self.round_index += 1;
                continue;
            }
            let clashes = |&(a, b): &Pair| match last {
                Some((x, y)) => [a, b].iter().any(|t| *t == x || *t == y),
                None => false,
            };
            let idx = round.iter().position(|p| !clashes(p)).unwrap_or(0);
            return Some((round.remove(idx), self.round_index + 1));
        }
        None
    }
}

/// Global fixture order for `groups`.
///
/// Passes over the groups in label order, taking one pair per group per pass, so groups advance
/// through their rounds roughly in lockstep. Within a pass it avoids putting a team in two
/// consecutive slots when the current round offers an alternative. This is best effort: a repeat
/// can still happen, most often where one group's pick follows another's.
pub fn interleave(groups: &[Group]) -> Vec<Fixture> {
    let mut cursors: Vec<GroupCursor<'_>> = groups
        .iter()
        .map(|g| GroupCursor {
            label: &g.label,
            rounds: rounds_for(&g.teams),
            round_index: 0,
        })
        .collect();
    cursors.sort_by(|a, b| (a.label.len(), a.label).cmp(&(b.label.len(), b.label)));

    let mut fixtures = Vec::new();
    let mut last: Option<Pair> = None;
    loop {
        let mut picked_this_pass = false;
        for cursor in &mut cursors {
            if let Some((pair, round_number)) = cursor.take_avoiding(last) {
                fixtures.push(Fixture::new(pair, cursor.label, round_number));
                last = Some(pair);
                picked_this_pass = true;
            }
        }
        if !picked_this_pass {
            break;
        }
    }
    fixtures
}

/// Start time of each fixture in order: `base + index * spacing`, or `None` without a base.
pub fn assign_start_times(
    fixtures: &[Fixture],
    base: Option<DateTime<Utc>>,
    spacing_minutes: u32,
) -> Vec<Option<DateTime<Utc>>> {
    (0..fixtures.len())
        .map(|i| base.map(|b| b + Duration::minutes(i64::from(spacing_minutes) * i as i64)))
        .collect()
}

/// Number of times a team plays in two consecutive slots.
pub fn back_to_back_repeats(fixtures: &[Fixture]) -> usize {
    fixtures
        .windows(2)
        .filter(|w| w[0].involves(w[1].team_a) || w[0].involves(w[1].team_b))
        .count()
}
