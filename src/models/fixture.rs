//! Draw output types: grouping plan, groups, rounds and fixtures.

use crate::models::game::TeamId;
use serde::{Deserialize, Serialize};

/// Smallest allowed group.
pub const MIN_GROUP_SIZE: usize = 3;
/// Largest allowed group.
pub const MAX_GROUP_SIZE: usize = 6;

/// `count` groups of `size` teams each.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupSize {
    pub size: usize,
    pub count: usize,
}

/// A chosen partition of a team count, as a multiset of group sizes.
pub type Grouping = Vec<GroupSize>;

/// Teams of one group in draw order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub label: String,
    pub teams: Vec<TeamId>,
}

/// One pairing; order inside the pair carries no meaning beyond home/away display.
pub type Pair = (TeamId, TeamId);

/// All pairings played in the same round of one group.
pub type Round = Vec<Pair>;

/// A drawn, not yet persisted match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub group_label: String,
    /// 1-based round within the group.
    pub round_number: usize,
    /// "Group {label} – R{n}".
    pub round_label: String,
}

impl Fixture {
    pub fn new(pair: Pair, group_label: &str, round_number: usize) -> Self {
        Self {
            team_a: pair.0,
            team_b: pair.1,
            group_label: group_label.to_string(),
            round_number,
            round_label: format!("Group {} – R{}", group_label, round_number),
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// Label of the `index`-th group: A..Z, then AA, AB, ...
pub fn group_label(index: usize) -> String {
    let mut n = index;
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}
