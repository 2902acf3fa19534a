//! Grouping selection: choose a balanced partition of N teams into groups of 3 to 6.

use crate::models::{GroupSize, Grouping, MAX_GROUP_SIZE, MIN_GROUP_SIZE};

/// Candidate scores are kept in hundredths so ties compare exactly.
const SCORE_SIZE_FOUR: i64 = 200;
const SCORE_SIZE_OTHER: i64 = 100;
const PENALTY_PER_IMBALANCE: i64 = 200;
const PENALTY_PER_GROUP: i64 = 5;

/// Choose group sizes for `team_count` teams.
///
/// Candidates split the teams as evenly as possible into `g = 1, 2, ...` groups, stopping once
/// an even split would go below 3. Each valid candidate is scored:
/// +2 per group of 4, +1 per group of 3, 5 or 6, -2 per size of imbalance and -0.05 per group.
/// The first best-scoring candidate wins. Fewer than 3 teams yields one group of all of them.
pub fn select_grouping(team_count: usize) -> Grouping {
    let trivial = || vec![GroupSize { size: team_count, count: 1 }];
    if team_count < MIN_GROUP_SIZE {
        return trivial();
    }

    let mut best: Option<(i64, Vec<usize>)> = None;
    for groups in 1..=team_count {
        let base = team_count / groups;
        let rem = team_count % groups;
        if base < MIN_GROUP_SIZE {
            break;
        }
        let sizes: Vec<usize> = (0..groups)
            .map(|i| if i < rem { base + 1 } else { base })
            .collect();
        if sizes
            .iter()
            .any(|&s| !(MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&s))
        {
            continue;
        }
        let score = score_candidate(&sizes);
        if best.as_ref().map_or(true, |(b, _)| score > *b) {
            best = Some((score, sizes));
        }
    }

    match best {
        Some((_, sizes)) => fold_sizes(sizes),
        None => trivial(),
    }
}

fn score_candidate(sizes: &[usize]) -> i64 {
    let preferred: i64 = sizes
        .iter()
        .map(|&s| if s == 4 { SCORE_SIZE_FOUR } else { SCORE_SIZE_OTHER })
        .sum();
    let max = sizes.iter().copied().max().unwrap_or(0);
    let min = sizes.iter().copied().min().unwrap_or(0);
    let imbalance = (max - min) as i64;
    preferred - imbalance * PENALTY_PER_IMBALANCE - sizes.len() as i64 * PENALTY_PER_GROUP
}

/// Largest groups first, then collapse equal sizes into `(size, count)`.
fn fold_sizes(mut sizes: Vec<usize>) -> Grouping {
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    let mut grouping: Grouping = Vec::new();
    for size in sizes {
        match grouping.last_mut() {
            Some(last) if last.size == size => last.count += 1,
            _ => grouping.push(GroupSize { size, count: 1 }),
        }
    }
    grouping
}

/// Total number of teams a grouping places.
pub fn grouping_team_count(grouping: &[GroupSize]) -> usize {
    grouping.iter().map(|g| g.size * g.count).sum()
}
