//! Domain types for LeagueLab

pub mod ranked;
pub mod season;
pub mod team;

pub use ranked::{RankedTeamRecord, TieMode, TieModeParseError};
pub use season::{table_hash, Season, SeasonParseError, SeasonResult, SCHEMA_VERSION};
pub use team::TeamRecord;
