//! Championship change detection and movers over a ranked season.

use serde::{Deserialize, Serialize};

use crate::domain::{RankedTeamRecord, SeasonResult};

/// The title would have gone to a different team under the alternate rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChampionshipChange {
    pub season: String,
    pub original: String,
    pub new: String,
}

/// Compare the published champion with the first team under the new ranking.
///
/// Returns `None` when the champion is unchanged or the result is empty.
pub fn championship_change(result: &SeasonResult) -> Option<ChampionshipChange> {
    let original = result.original_champion()?;
    let new = result.new_champion()?;
    if original.record.name == new.record.name {
        return None;
    }
    Some(ChampionshipChange {
        season: result.season.clone(),
        original: original.record.name.clone(),
        new: new.record.name.clone(),
    })
}

pub fn has_championship_change(result: &SeasonResult) -> bool {
    championship_change(result).is_some()
}

/// The `n` teams whose position moved the most, largest move first.
///
/// Unchanged teams are excluded. On equal magnitude, climbers come before
/// fallers, then the better new position wins.
pub fn biggest_movers(result: &SeasonResult, n: usize) -> Vec<&RankedTeamRecord> {
    let mut movers: Vec<&RankedTeamRecord> = result
        .standings
        .iter()
        .filter(|t| t.position_change != 0)
        .collect();

    movers.sort_by(|a, b| {
        b.position_change
            .abs()
            .cmp(&a.position_change.abs())
            .then_with(|| b.position_change.cmp(&a.position_change))
            .then_with(|| a.new_position.cmp(&b.new_position))
    });
    movers.truncate(n);
    movers
}
