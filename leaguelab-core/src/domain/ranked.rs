//! Engine output types: ranked records and tie handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::team::TeamRecord;

/// A [`TeamRecord`] annotated with its standing under an alternate points rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeamRecord {
    pub record: TeamRecord,
    pub computed_points: f64,
    pub new_position: u32,
    /// `original_position - new_position`: positive means the team climbed.
    pub position_change: i64,
}

impl RankedTeamRecord {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn original_position(&self) -> u32 {
        self.record.original_position
    }
}

/// How teams with equal computed points are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieMode {
    /// Strictly increasing positions; ties keep their original order.
    #[default]
    Sequential,
    /// Standard competition ranking ("1224"): a tied group shares its best position.
    Competition,
}

impl TieMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Competition => "competition",
        }
    }
}

impl fmt::Display for TieMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown tie mode '{0}' (valid: sequential, competition)")]
pub struct TieModeParseError(pub String);

impl FromStr for TieMode {
    type Err = TieModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "strict" => Ok(Self::Sequential),
            "competition" | "min" | "joint" => Ok(Self::Competition),
            other => Err(TieModeParseError(other.to_string())),
        }
    }
}
