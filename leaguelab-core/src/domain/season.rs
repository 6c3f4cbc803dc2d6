//! Seasons, season codes, and the per-season analysis artifact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::ranked::{RankedTeamRecord, TieMode};
use super::team::TeamRecord;

/// Current schema version for persisted season results.
pub const SCHEMA_VERSION: u32 = 1;

/// A competition season, identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn end_year(&self) -> i32 {
        self.start_year + 1
    }

    /// Human-readable label, e.g. `"2016-2017"`.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start_year, self.end_year())
    }

    /// Two-digit-year-pair code, e.g. `"1617"` for the 2016 season.
    pub fn code(&self) -> String {
        format!(
            "{:02}{:02}",
            self.start_year.rem_euclid(100),
            self.end_year().rem_euclid(100)
        )
    }

    /// File name of the persisted raw table, e.g. `"epl1617leaguetable.csv"`.
    pub fn table_file_name(&self) -> String {
        format!("epl{}leaguetable.csv", self.code())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.end_year())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeasonParseError {
    #[error("invalid season '{0}' (expected YYYY or YYYY-YYYY)")]
    Malformed(String),

    #[error("season '{0}' does not span consecutive years")]
    NotConsecutive(String),
}

impl FromStr for Season {
    type Err = SeasonParseError;

    /// Accepts `"2016"` or `"2016-2017"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_year = |part: &str| -> Result<i32, SeasonParseError> {
            if part.len() != 4 {
                return Err(SeasonParseError::Malformed(s.to_string()));
            }
            part.parse::<i32>()
                .map_err(|_| SeasonParseError::Malformed(s.to_string()))
        };

        match s.split_once('-') {
            None => Ok(Season::new(parse_year(s)?)),
            Some((start, end)) => {
                let start = parse_year(start)?;
                let end = parse_year(end)?;
                if end != start + 1 {
                    return Err(SeasonParseError::NotConsecutive(s.to_string()));
                }
                Ok(Season::new(start))
            }
        }
    }
}

/// One season's re-ranked table: the engine's sole output artifact.
///
/// `standings` is ordered by ascending `new_position`. `table_hash` identifies
/// the input table so that historical analyses can be matched to their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub season: String,
    pub rule: String,
    #[serde(default)]
    pub tie_mode: TieMode,
    pub table_hash: String,
    pub standings: Vec<RankedTeamRecord>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SeasonResult {
    /// The team ranked first under the alternate rule.
    pub fn new_champion(&self) -> Option<&RankedTeamRecord> {
        self.standings.first()
    }

    /// The team that finished first in the published table.
    pub fn original_champion(&self) -> Option<&RankedTeamRecord> {
        self.standings
            .iter()
            .find(|t| t.record.original_position == 1)
    }

    pub fn team(&self, name: &str) -> Option<&RankedTeamRecord> {
        self.standings.iter().find(|t| t.record.name == name)
    }
}

/// Deterministic BLAKE3 hash over a season table.
///
/// Records are hashed in original-position order so the hash does not
/// depend on the order a provider returned them in.
pub fn table_hash(table: &[TeamRecord]) -> String {
    let mut sorted: Vec<&TeamRecord> = table.iter().collect();
    sorted.sort_by(|a, b| {
        a.original_position
            .cmp(&b.original_position)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut hasher = blake3::Hasher::new();
    for team in sorted {
        hasher.update(team.name.as_bytes());
        hasher.update(&[0]);
        for value in [
            team.original_position,
            team.played,
            team.won,
            team.drawn,
            team.lost,
            team.goals_for,
            team.goals_against,
            team.original_points,
        ] {
            hasher.update(&value.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
