//! Serializable analysis configuration.
//!
//! Loaded from TOML; every section has defaults so an empty file is a valid
//! config (last 20 seasons of the Premier League under 2 points for a win).
//! The API token is never stored in the file, only the name of the
//! environment variable holding it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use leaguelab_core::data::football_data::{DEFAULT_BASE_URL, DEFAULT_COMPETITION};
use leaguelab_core::data::FootballDataConfig;
use leaguelab_core::domain::{Season, TieMode};
use leaguelab_core::scoring::{RulePreset, WeightedRule};

pub const DEFAULT_SEASON_COUNT: u32 = 20;
pub const DEFAULT_API_KEY_ENV: &str = "FOOTBALL_DATA_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub seasons: SeasonsConfig,
    pub rule: RuleConfig,
    pub ranking: RankingConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.seasons.range()?;
        self.rule.to_rule()?;
        if self.source.competition.trim().is_empty() {
            return Err(ConfigError::Invalid("source.competition must not be empty".into()));
        }
        Ok(())
    }
}

/// Which seasons to analyze.
///
/// Either an explicit `from`/`to` span of start years, or the `last` N
/// seasons counting back from the current year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonsConfig {
    pub from: Option<i32>,
    pub to: Option<i32>,
    pub last: Option<u32>,
}

impl SeasonsConfig {
    pub fn range(&self) -> Result<SeasonRange, ConfigError> {
        match (self.from, self.to, self.last) {
            (Some(_), Some(_), Some(_)) => Err(ConfigError::Invalid(
                "seasons.last cannot be combined with seasons.from/to".into(),
            )),
            (Some(from), Some(to), None) => {
                if from > to {
                    return Err(ConfigError::Invalid(format!(
                        "seasons.from ({from}) is after seasons.to ({to})"
                    )));
                }
                Ok(SeasonRange::Span { from, to })
            }
            (Some(_), None, _) | (None, Some(_), _) => Err(ConfigError::Invalid(
                "seasons.from and seasons.to must be given together".into(),
            )),
            (None, None, last) => {
                let count = last.unwrap_or(DEFAULT_SEASON_COUNT);
                if count == 0 {
                    return Err(ConfigError::Invalid("seasons.last must be at least 1".into()));
                }
                Ok(SeasonRange::Last { count })
            }
        }
    }
}

/// A resolved span of seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonRange {
    /// Start years `from..=to`, oldest first.
    Span { from: i32, to: i32 },
    /// The `count` seasons starting `current_year, current_year - 1, ...`, newest first.
    Last { count: u32 },
}

impl SeasonRange {
    pub fn seasons(&self, current_year: i32) -> Vec<Season> {
        match *self {
            Self::Span { from, to } => (from..=to).map(Season::new).collect(),
            Self::Last { count } => (0..count as i32)
                .map(|offset| Season::new(current_year - offset))
                .collect(),
        }
    }

    /// Seasons relative to today's date.
    pub fn resolve(&self) -> Vec<Season> {
        use chrono::Datelike;
        self.seasons(chrono::Local::now().year())
    }
}

/// Points rule selection: a named preset or explicit weights, not both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub preset: Option<RulePreset>,
    pub win: Option<f64>,
    pub draw: Option<f64>,
    pub loss: Option<f64>,
}

impl RuleConfig {
    pub fn from_preset(preset: RulePreset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    fn has_weights(&self) -> bool {
        self.win.is_some() || self.draw.is_some() || self.loss.is_some()
    }

    pub fn to_rule(&self) -> Result<WeightedRule, ConfigError> {
        if !self.has_weights() {
            return Ok(self.preset.unwrap_or_default().to_rule());
        }
        if self.preset.is_some() {
            return Err(ConfigError::Invalid(
                "rule.preset cannot be combined with explicit weights".into(),
            ));
        }
        let (Some(win), Some(draw)) = (self.win, self.draw) else {
            return Err(ConfigError::Invalid(
                "custom rules need both rule.win and rule.draw".into(),
            ));
        };
        WeightedRule::new(win, draw, self.loss.unwrap_or(0.0))
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub tie_mode: TieMode,
}

/// Where tables come from and where raw tables are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub competition: String,
    pub base_url: String,
    pub api_key_env: String,
    pub data_dir: PathBuf,
    /// Never touch the network; persisted tables only.
    pub offline: bool,
    /// Write freshly fetched tables back to `data_dir`.
    pub persist: bool,
    /// Ignore persisted tables and always fetch.
    pub force: bool,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            competition: DEFAULT_COMPETITION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            data_dir: PathBuf::from("data"),
            offline: false,
            persist: true,
            force: false,
            max_retries: 2,
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    /// The API token from the configured environment variable, if set and non-empty.
    pub fn api_token(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn football_data_config(&self) -> FootballDataConfig {
        FootballDataConfig {
            base_url: self.base_url.clone(),
            competition: self.competition.clone(),
            api_token: self.api_token(),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            ..FootballDataConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub csv: bool,
    pub json: bool,
    /// How many movers to list per season in console output.
    pub movers: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            csv: true,
            json: false,
            movers: 3,
        }
    }
}
