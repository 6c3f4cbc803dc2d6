//! Standings provider trait and structured error types.
//!
//! The StandingsProvider trait abstracts over where a season table comes
//! from (football-data.org, a persisted CSV file) so callers can swap
//! implementations and mock them in tests. Every provider normalizes its
//! source into [`TeamRecord`]s before the engine sees them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Season, TeamRecord};

/// Structured error types for data operations.
///
/// Displayable in CLI logs; the orchestrator turns any of these into a
/// skipped season.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("no standings for season {season}")]
    SeasonNotFound { season: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Where a season table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    FootballData,
    CsvFile,
}

/// Result of a successful fetch for a single season.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub season: Season,
    pub table: Vec<TeamRecord>,
    pub source: DataSource,
}

/// Trait for standings providers.
///
/// Providers know nothing about ranking or persistence; the loader layer
/// decides which provider to ask and whether to write the table back.
pub trait StandingsProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the final table for one season.
    fn fetch(&self, season: Season) -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-season fetches.
pub trait FetchProgress: Send {
    fn on_start(&self, season: Season, index: usize, total: usize);

    fn on_complete(&self, season: Season, result: &Result<(), DataError>);

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, season: Season, index: usize, total: usize) {
        println!("[{}/{}] Fetching {season}...", index + 1, total);
    }

    fn on_complete(&self, season: Season, result: &Result<(), DataError>) {
        match result {
            Ok(()) => println!("  OK: {season}"),
            Err(e) => println!("  FAIL: {season}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nFetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}
