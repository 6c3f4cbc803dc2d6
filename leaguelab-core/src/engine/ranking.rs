//! Re-rank a season table under an alternate points rule.
//!
//! Pure transform: a validated table goes in, a new ranked table comes out.
//! Inputs are never mutated and the same input always produces the same
//! output, tie order included.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::domain::{table_hash, RankedTeamRecord, Season, SeasonResult, TeamRecord, TieMode, SCHEMA_VERSION};
use crate::scoring::PointsRule;

/// Computed points are compared at this resolution (millionths of a point).
const POINTS_SCALE: f64 = 1_000_000.0;

/// Integer comparison key for a computed total.
///
/// Weights such as 0.1 are not exact in binary, so two records worth the
/// same total can differ in their last bits. Ordering and tie grouping both
/// go through this key, never through raw `f64` comparison.
pub fn points_key(points: f64) -> i64 {
    (points * POINTS_SCALE).round() as i64
}

/// Whether two computed totals are a tie.
pub fn same_points(a: f64, b: f64) -> bool {
    points_key(a) == points_key(b)
}

/// Engine-local failures. Always surfaced; a corrupt table never yields a ranking.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RankingError {
    #[error("season table is empty")]
    EmptyTable,

    #[error("invalid record for '{team}': {reason}")]
    InvalidRecord { team: String, reason: String },

    #[error("duplicate team '{team}' in season table")]
    DuplicateTeam { team: String },
}

/// A [`RankingError`] tagged with the season it occurred in.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("season {season}: {source}")]
pub struct SeasonError {
    pub season: String,
    #[source]
    pub source: RankingError,
}

/// Check the table invariants the engine relies on.
///
/// - at least one record
/// - `played == won + drawn + lost` for every record
/// - unique team names
/// - original positions form a contiguous permutation of `1..=N`
pub fn validate_table(table: &[TeamRecord]) -> Result<(), RankingError> {
    if table.is_empty() {
        return Err(RankingError::EmptyTable);
    }

    let n = table.len();
    let mut names: HashSet<&str> = HashSet::with_capacity(n);
    let mut positions: HashMap<u32, &str> = HashMap::with_capacity(n);

    for team in table {
        if !team.results_add_up() {
            return Err(RankingError::InvalidRecord {
                team: team.name.clone(),
                reason: format!(
                    "played {} but won {} + drawn {} + lost {}",
                    team.played, team.won, team.drawn, team.lost
                ),
            });
        }

        if !names.insert(team.name.as_str()) {
            return Err(RankingError::DuplicateTeam {
                team: team.name.clone(),
            });
        }

        let pos = team.original_position;
        if pos == 0 || pos as usize > n {
            return Err(RankingError::InvalidRecord {
                team: team.name.clone(),
                reason: format!("original position {pos} outside 1..={n}"),
            });
        }
        if let Some(other) = positions.insert(pos, team.name.as_str()) {
            return Err(RankingError::InvalidRecord {
                team: team.name.clone(),
                reason: format!("original position {pos} already held by '{other}'"),
            });
        }
    }

    Ok(())
}

/// Re-rank `table` under `rule` with strictly increasing positions.
pub fn compute_ranking(
    table: &[TeamRecord],
    rule: &dyn PointsRule,
) -> Result<Vec<RankedTeamRecord>, RankingError> {
    compute_ranking_with(table, rule, TieMode::Sequential)
}

/// Re-rank `table` under `rule`, numbering tied teams per `tie_mode`.
///
/// Teams are ordered by computed points descending; equal points keep the
/// published order (lower `original_position` first). The output is sorted
/// by that order in both tie modes.
pub fn compute_ranking_with(
    table: &[TeamRecord],
    rule: &dyn PointsRule,
    tie_mode: TieMode,
) -> Result<Vec<RankedTeamRecord>, RankingError> {
    validate_table(table)?;

    let mut scored: Vec<(i64, f64, &TeamRecord)> = Vec::with_capacity(table.len());
    for team in table {
        let points = rule.points(team.won, team.drawn, team.lost);
        if !points.is_finite() {
            return Err(RankingError::InvalidRecord {
                team: team.name.clone(),
                reason: format!("rule '{}' produced non-finite points", rule.name()),
            });
        }
        scored.push((points_key(points), points, team));
    }

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.2.original_position.cmp(&b.2.original_position))
    });

    let mut ranked: Vec<RankedTeamRecord> = Vec::with_capacity(scored.len());
    let mut prev_key = None;
    for (i, (key, points, team)) in scored.into_iter().enumerate() {
        let sequential = (i + 1) as u32;
        let new_position = match (tie_mode, ranked.last()) {
            (TieMode::Competition, Some(prev)) if prev_key == Some(key) => prev.new_position,
            _ => sequential,
        };
        prev_key = Some(key);

        ranked.push(RankedTeamRecord {
            record: team.clone(),
            computed_points: points,
            new_position,
            position_change: i64::from(team.original_position) - i64::from(new_position),
        });
    }

    Ok(ranked)
}

/// Rank one season and package it as a [`SeasonResult`].
pub fn rank_season(
    season: Season,
    table: &[TeamRecord],
    rule: &dyn PointsRule,
    tie_mode: TieMode,
) -> Result<SeasonResult, SeasonError> {
    let standings = compute_ranking_with(table, rule, tie_mode).map_err(|source| SeasonError {
        season: season.label(),
        source,
    })?;

    Ok(SeasonResult {
        schema_version: SCHEMA_VERSION,
        season: season.label(),
        rule: rule.name().to_string(),
        tie_mode,
        table_hash: table_hash(table),
        standings,
    })
}
