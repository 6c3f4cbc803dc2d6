//! Standings sources: the provider trait, football-data.org, persisted CSV tables.

pub mod football_data;
pub mod provider;
pub mod table_csv;

pub use football_data::{FootballDataConfig, FootballDataProvider};
pub use provider::{
    DataError, DataSource, FetchProgress, FetchResult, StandingsProvider, StdoutProgress,
};
pub use table_csv::{
    read_table, read_table_file, table_fields, write_table, write_table_file, CsvTableProvider,
    TABLE_HEADER,
};
