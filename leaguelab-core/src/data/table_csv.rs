//! Persisted season tables: CSV codec and file-backed provider.
//!
//! Files follow the `data/epl<code>leaguetable.csv` naming convention with
//! the header `Position,Club,Matches,Wins,Draws,Losses,GoalsScored,
//! GoalsConceded,GoalDiff,Points`. Every field is quoted on write so files
//! stay compatible with tables exported by earlier tooling.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::provider::{DataError, DataSource, FetchResult, StandingsProvider};
use crate::domain::{Season, TeamRecord};

/// Column order of a persisted season table.
pub const TABLE_HEADER: [&str; 10] = [
    "Position",
    "Club",
    "Matches",
    "Wins",
    "Draws",
    "Losses",
    "GoalsScored",
    "GoalsConceded",
    "GoalDiff",
    "Points",
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TableRow {
    position: u32,
    club: String,
    matches: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_scored: u32,
    goals_conceded: u32,
    goal_diff: i64,
    points: u32,
}

impl From<&TeamRecord> for TableRow {
    fn from(team: &TeamRecord) -> Self {
        Self {
            position: team.original_position,
            club: team.name.clone(),
            matches: team.played,
            wins: team.won,
            draws: team.drawn,
            losses: team.lost,
            goals_scored: team.goals_for,
            goals_conceded: team.goals_against,
            goal_diff: team.goal_difference(),
            points: team.original_points,
        }
    }
}

impl TableRow {
    fn into_record(self) -> Result<TeamRecord, DataError> {
        let expected = i64::from(self.goals_scored) - i64::from(self.goals_conceded);
        if self.goal_diff != expected {
            return Err(DataError::InvalidTable(format!(
                "'{}': GoalDiff {} does not match {} - {}",
                self.club, self.goal_diff, self.goals_scored, self.goals_conceded
            )));
        }
        Ok(TeamRecord {
            name: self.club,
            original_position: self.position,
            played: self.matches,
            won: self.wins,
            drawn: self.draws,
            lost: self.losses,
            goals_for: self.goals_scored,
            goals_against: self.goals_conceded,
            original_points: self.points,
        })
    }
}

/// The ten persisted columns for one team, in [`TABLE_HEADER`] order.
pub fn table_fields(team: &TeamRecord) -> [String; 10] {
    [
        team.original_position.to_string(),
        team.name.clone(),
        team.played.to_string(),
        team.won.to_string(),
        team.drawn.to_string(),
        team.lost.to_string(),
        team.goals_for.to_string(),
        team.goals_against.to_string(),
        team.goal_difference().to_string(),
        team.original_points.to_string(),
    ]
}

/// Read a season table from CSV.
///
/// The header must contain every column of [`TABLE_HEADER`]; extra columns
/// are ignored.
pub fn read_table<R: Read>(reader: R) -> Result<Vec<TeamRecord>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for column in TABLE_HEADER {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::InvalidTable(format!("missing column '{column}'")));
        }
    }

    let mut table = Vec::new();
    for row in rdr.deserialize::<TableRow>() {
        table.push(row?.into_record()?);
    }
    Ok(table)
}

/// Write a season table as CSV, rows ordered by original position.
pub fn write_table<W: Write>(writer: W, table: &[TeamRecord]) -> Result<(), DataError> {
    let mut sorted: Vec<&TeamRecord> = table.iter().collect();
    sorted.sort_by_key(|t| t.original_position);

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    for team in sorted {
        wtr.serialize(TableRow::from(team))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_table_file(path: &Path) -> Result<Vec<TeamRecord>, DataError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            DataError::SourceUnavailable(format!("no table file at {}", path.display()))
        }
        _ => DataError::Io(e),
    })?;
    read_table(file)
}

/// Write a table file, creating the parent directory if needed.
pub fn write_table_file(path: &Path, table: &[TeamRecord]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_table(file, table)?;
    debug!(path = %path.display(), teams = table.len(), "wrote season table");
    Ok(())
}

/// Reads previously persisted tables from a data directory.
#[derive(Debug, Clone)]
pub struct CsvTableProvider {
    data_dir: PathBuf,
}

impl CsvTableProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the persisted table for `season`.
    pub fn path_for(&self, season: Season) -> PathBuf {
        self.data_dir.join(season.table_file_name())
    }

    pub fn has_season(&self, season: Season) -> bool {
        self.path_for(season).is_file()
    }
}

impl StandingsProvider for CsvTableProvider {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn fetch(&self, season: Season) -> Result<FetchResult, DataError> {
        let table = read_table_file(&self.path_for(season))?;
        Ok(FetchResult {
            season,
            table,
            source: DataSource::CsvFile,
        })
    }
}
