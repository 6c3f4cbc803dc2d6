//! LeagueLab Core: season tables, points rules, and the re-ranking engine.
//!
//! This crate contains:
//! - Domain types (team records, ranked records, seasons, season results)
//! - Points rules with named presets
//! - The pure ranking engine and championship change detection
//! - Standings providers (football-data.org, persisted CSV tables)

pub mod data;
pub mod domain;
pub mod engine;
pub mod scoring;

pub use domain::{RankedTeamRecord, Season, SeasonResult, TeamRecord, TieMode};
pub use engine::{compute_ranking, compute_ranking_with, rank_season, RankingError, SeasonError};
pub use scoring::{PointsRule, RulePreset, WeightedRule};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine inputs and outputs can cross threads, so
    /// independent seasons can be ranked concurrently.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<TeamRecord>();
        require_sync::<TeamRecord>();
        require_send::<RankedTeamRecord>();
        require_sync::<RankedTeamRecord>();
        require_send::<SeasonResult>();
        require_sync::<SeasonResult>();
        require_send::<WeightedRule>();
        require_sync::<WeightedRule>();
        require_send::<RankingError>();
        require_sync::<RankingError>();
        require_send::<data::CsvTableProvider>();
        require_sync::<data::CsvTableProvider>();
        require_send::<data::FootballDataProvider>();
        require_sync::<data::FootballDataProvider>();
    }

    /// Architecture contract: PointsRule sees only (won, drawn, lost).
    ///
    /// Goals, names and positions cannot influence computed points because
    /// the trait never receives them.
    #[test]
    fn points_rule_receives_results_only() {
        fn _check(rule: &dyn PointsRule, team: &TeamRecord) -> f64 {
            rule.points(team.won, team.drawn, team.lost)
        }
    }
}
