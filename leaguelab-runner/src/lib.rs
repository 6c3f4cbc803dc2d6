//! LeagueLab Runner: season-range analysis on top of `leaguelab-core`.
//!
//! This crate provides:
//! - TOML analysis configuration
//! - Table loading with persisted-file / remote fallback
//! - Multi-season orchestration that skips unavailable seasons
//! - Console, CSV and JSON reports

pub mod config;
pub mod loader;
pub mod orchestrator;
pub mod report;

pub use config::{AnalysisConfig, ConfigError, OutputConfig, SeasonRange};
pub use loader::{fetch_seasons, FetchSummary, LoadError, LoadOptions, SeasonLoader, StandingsLoader};
pub use orchestrator::{analyze_range, RangeReport, SkippedSeason};
pub use report::{
    export_season_csv, export_season_json, import_season_json, render_movers, render_season,
    render_summary, save_season,
};
