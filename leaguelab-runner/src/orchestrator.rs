//! Multi-season analysis.
//!
//! Tables are loaded one season at a time (the remote API is rate limited),
//! then ranked in parallel. A season that cannot be loaded or ranked is
//! logged and recorded as skipped; it never aborts the range.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use leaguelab_core::domain::{Season, SeasonResult, TieMode};
use leaguelab_core::engine::{championship_change, rank_season, ChampionshipChange};
use leaguelab_core::scoring::PointsRule;

use crate::loader::SeasonLoader;

/// A season that produced no result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSeason {
    pub season: String,
    pub reason: String,
}

/// Everything one range analysis produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeReport {
    /// Ranked seasons, in requested order.
    pub results: Vec<SeasonResult>,
    pub skipped: Vec<SkippedSeason>,
}

impl RangeReport {
    pub fn requested(&self) -> usize {
        self.results.len() + self.skipped.len()
    }

    pub fn championship_changes(&self) -> Vec<ChampionshipChange> {
        self.results.iter().filter_map(championship_change).collect()
    }
}

/// Load, rank and collect every season in `seasons`.
pub fn analyze_range(
    seasons: &[Season],
    loader: &dyn SeasonLoader,
    rule: &dyn PointsRule,
    tie_mode: TieMode,
) -> RangeReport {
    info!(seasons = seasons.len(), rule = rule.name(), %tie_mode, "analyzing season range");

    let loaded: Vec<_> = seasons
        .iter()
        .map(|&season| {
            let outcome = loader.load(season);
            if let Err(e) = &outcome {
                warn!(%season, error = %e, "skipping season");
            }
            (season, outcome)
        })
        .collect();

    let outcomes: Vec<Result<SeasonResult, SkippedSeason>> = loaded
        .into_par_iter()
        .map(|(season, outcome)| {
            let fetched = outcome.map_err(|e| SkippedSeason {
                season: season.label(),
                reason: e.to_string(),
            })?;
            rank_season(season, &fetched.table, rule, tie_mode).map_err(|e| {
                warn!(%season, error = %e, "skipping season");
                SkippedSeason {
                    season: season.label(),
                    reason: e.source.to_string(),
                }
            })
        })
        .collect();

    let mut report = RangeReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(result) => report.results.push(result),
            Err(skipped) => report.skipped.push(skipped),
        }
    }

    info!(
        analyzed = report.results.len(),
        skipped = report.skipped.len(),
        "season range complete"
    );
    report
}
