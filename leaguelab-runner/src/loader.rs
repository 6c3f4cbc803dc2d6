//! Season table loading for the runner.
//!
//! Resolves one season's table with this fallback policy:
//! 1. Persisted table in the data directory (skipped with `force`)
//! 2. Remote provider, unless `offline` or none is configured
//! 3. Otherwise fail with the season label and the last underlying error
//!
//! Freshly fetched tables are written back to the data directory when
//! `persist` is on, so later runs can work offline.

use thiserror::Error;
use tracing::{debug, info, warn};

use leaguelab_core::data::{
    write_table_file, CsvTableProvider, DataError, FetchProgress, FetchResult, StandingsProvider,
};
use leaguelab_core::domain::Season;

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no persisted table for {season} and offline mode is on")]
    NoCachedDataOffline { season: String },

    #[error("no table for {season}: {source}")]
    Unavailable {
        season: String,
        #[source]
        source: DataError,
    },
}

impl LoadError {
    pub fn season(&self) -> &str {
        match self {
            Self::NoCachedDataOffline { season } | Self::Unavailable { season, .. } => season,
        }
    }
}

/// Options controlling how tables are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Never make network requests.
    pub offline: bool,
    /// Fetch remotely even when a persisted table exists.
    pub force: bool,
    /// Write remote tables back to the data directory.
    pub persist: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            offline: false,
            force: false,
            persist: true,
        }
    }
}

/// Anything that can produce one season's table.
///
/// The orchestrator only needs this seam; tests substitute scripted loaders.
pub trait SeasonLoader: Sync {
    fn load(&self, season: Season) -> Result<FetchResult, LoadError>;
}

/// File-first loader with an optional remote fallback.
pub struct StandingsLoader<'a> {
    files: CsvTableProvider,
    remote: Option<&'a dyn StandingsProvider>,
    opts: LoadOptions,
}

impl<'a> StandingsLoader<'a> {
    pub fn new(
        files: CsvTableProvider,
        remote: Option<&'a dyn StandingsProvider>,
        opts: LoadOptions,
    ) -> Self {
        Self {
            files,
            remote,
            opts,
        }
    }

    /// Loader that only reads persisted tables.
    pub fn offline(files: CsvTableProvider) -> Self {
        Self::new(
            files,
            None,
            LoadOptions {
                offline: true,
                ..LoadOptions::default()
            },
        )
    }

    fn persist(&self, fetched: &FetchResult) {
        let path = self.files.path_for(fetched.season);
        match write_table_file(&path, &fetched.table) {
            Ok(()) => info!(season = %fetched.season, path = %path.display(), "persisted table"),
            // A write failure does not invalidate the table we already have.
            Err(e) => warn!(season = %fetched.season, error = %e, "could not persist table"),
        }
    }
}

impl SeasonLoader for StandingsLoader<'_> {
    fn load(&self, season: Season) -> Result<FetchResult, LoadError> {
        let mut last_error = None;

        if !self.opts.force {
            match self.files.fetch(season) {
                Ok(fetched) => {
                    debug!(%season, teams = fetched.table.len(), "loaded persisted table");
                    return Ok(fetched);
                }
                Err(DataError::SourceUnavailable(reason)) => {
                    debug!(%season, %reason, "no persisted table");
                    last_error = Some(DataError::SourceUnavailable(reason));
                }
                Err(e) => {
                    warn!(%season, error = %e, "persisted table is unreadable");
                    last_error = Some(e);
                }
            }
        }

        let remote = match self.remote {
            Some(remote) if !self.opts.offline => remote,
            _ => {
                return Err(match last_error {
                    Some(DataError::SourceUnavailable(_)) | None => LoadError::NoCachedDataOffline {
                        season: season.label(),
                    },
                    Some(source) => LoadError::Unavailable {
                        season: season.label(),
                        source,
                    },
                });
            }
        };

        match remote.fetch(season) {
            Ok(fetched) => {
                info!(%season, provider = remote.name(), teams = fetched.table.len(), "fetched table");
                if self.opts.persist {
                    self.persist(&fetched);
                }
                Ok(fetched)
            }
            Err(source) => Err(LoadError::Unavailable {
                season: season.label(),
                source,
            }),
        }
    }
}

/// Outcome of a multi-season fetch.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, DataError)>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Fetch and persist raw tables for several seasons.
///
/// Persisted tables are kept unless `force` is set. One failing season
/// does not stop the batch.
pub fn fetch_seasons(
    provider: &dyn StandingsProvider,
    files: &CsvTableProvider,
    seasons: &[Season],
    force: bool,
    progress: &dyn FetchProgress,
) -> FetchSummary {
    let total = seasons.len();
    let mut succeeded = 0;
    let mut errors = Vec::new();

    for (i, &season) in seasons.iter().enumerate() {
        progress.on_start(season, i, total);

        if !force && files.has_season(season) {
            debug!(%season, "table already persisted");
            progress.on_complete(season, &Ok(()));
            succeeded += 1;
            continue;
        }

        let result = provider
            .fetch(season)
            .and_then(|fetched| write_table_file(&files.path_for(season), &fetched.table));
        progress.on_complete(season, &result);

        match result {
            Ok(()) => succeeded += 1,
            Err(e) => {
                warn!(%season, error = %e, "fetch failed");
                errors.push((season.label(), e));
            }
        }
    }

    let failed = errors.len();
    progress.on_batch_complete(succeeded, failed, total);

    FetchSummary {
        total,
        succeeded,
        failed,
        errors,
    }
}
