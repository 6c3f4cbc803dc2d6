//! One team's final line in a season table.

use serde::{Deserialize, Serialize};

/// One team's state for one season, as published by the source of truth.
///
/// Records are created once per season by a provider and never mutated.
/// The engine reads them and produces [`RankedTeamRecord`](super::RankedTeamRecord)
/// values alongside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub original_position: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub original_points: u32,
}

impl TeamRecord {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Returns true when `played == won + drawn + lost`.
    pub fn results_add_up(&self) -> bool {
        u64::from(self.won) + u64::from(self.drawn) + u64::from(self.lost)
            == u64::from(self.played)
    }
}
