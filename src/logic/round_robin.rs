//! Circle-method round robin for a single group.

use crate::models::{Round, TeamId};

/// Rounds in which every pair of `group` meets exactly once.
///
/// Odd groups get a bye slot, so one team sits out each round. Position 0 stays fixed; after
/// each round the other positions rotate by one. Pairs are taken from both ends inward.
pub fn rounds_for(group: &[TeamId]) -> Vec<Round> {
    let mut slots: Vec<Option<TeamId>> = group.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    let mut rounds = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        let round: Round = (0..n / 2)
            .filter_map(|i| match (slots[i], slots[n - 1 - i]) {
                (Some(a), Some(b)) => Some((a, b)),
                _ => None,
            })
            .collect();
        rounds.push(round);
        slots[1..].rotate_right(1);
    }
    rounds
}

/// Number of matches a group of `size` plays: `C(size, 2)`.
pub fn pair_count(size: usize) -> usize {
    size * size.saturating_sub(1) / 2
}
