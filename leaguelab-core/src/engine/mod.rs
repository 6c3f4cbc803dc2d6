//! Re-ranking engine: points rule in, ranked table out.

pub mod champion;
pub mod ranking;

pub use champion::{biggest_movers, championship_change, has_championship_change, ChampionshipChange};
pub use ranking::{
    compute_ranking, compute_ranking_with, points_key, rank_season, same_points, validate_table,
    RankingError, SeasonError,
};
