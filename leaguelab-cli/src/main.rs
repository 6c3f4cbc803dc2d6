//! LeagueLab CLI: fetch, analyze and show commands.
//!
//! Commands:
//! - `fetch`: download final tables from football-data.org and persist them as CSV
//! - `analyze`: re-rank a range of seasons under an alternate points rule
//! - `show`: re-rank a single persisted season

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use leaguelab_core::data::football_data::DEFAULT_COMPETITION;
use leaguelab_core::data::{CsvTableProvider, FootballDataProvider, StandingsProvider, StdoutProgress};
use leaguelab_core::domain::{Season, TieMode};
use leaguelab_core::engine::rank_season;
use leaguelab_core::scoring::RulePreset;
use leaguelab_runner::config::{RuleConfig, SeasonsConfig, SourceConfig};
use leaguelab_runner::{
    analyze_range, fetch_seasons, render_movers, render_season, render_summary, save_season,
    AnalysisConfig, LoadOptions, SeasonLoader, StandingsLoader,
};

#[derive(Parser)]
#[command(
    name = "leaguelab",
    about = "LeagueLab CLI: final league tables re-ranked under alternate points rules"
)]
struct Cli {
    /// Log verbosity: -v for info, -vv for debug. RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download final tables and persist them to the data directory.
    Fetch {
        /// First season start year.
        #[arg(long)]
        from: i32,

        /// Last season start year (inclusive).
        #[arg(long)]
        to: i32,

        /// football-data.org competition code.
        #[arg(long, default_value = DEFAULT_COMPETITION)]
        competition: String,

        /// Data directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Re-download even if a table is already persisted.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Re-rank a range of seasons and save the results.
    Analyze {
        /// Path to a TOML config file. Flags below override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Points rule: two_points_for_win (2-1-0), three_points_for_win (3-1-0), three_win_two_draw (3-2-0).
        #[arg(long)]
        rule: Option<RulePreset>,

        /// First season start year.
        #[arg(long, requires = "to", conflicts_with = "last")]
        from: Option<i32>,

        /// Last season start year (inclusive).
        #[arg(long, requires = "from")]
        to: Option<i32>,

        /// Analyze the N most recent seasons.
        #[arg(long)]
        last: Option<u32>,

        /// Tie handling: sequential or competition.
        #[arg(long)]
        tie_mode: Option<TieMode>,

        /// Offline mode: persisted tables only.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Data directory for persisted tables.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output directory for ranked CSV/JSON.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also write JSON results.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Re-rank one persisted season and print it.
    Show {
        /// Season as 2016 or 2016-2017.
        season: Season,

        /// Points rule preset.
        #[arg(long, default_value = "two_points_for_win")]
        rule: RulePreset,

        /// Tie handling: sequential or competition.
        #[arg(long, default_value = "sequential")]
        tie_mode: TieMode,

        /// Data directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Fetch {
            from,
            to,
            competition,
            data_dir,
            force,
        } => run_fetch(from, to, competition, data_dir, force),
        Commands::Analyze {
            config,
            rule,
            from,
            to,
            last,
            tie_mode,
            offline,
            data_dir,
            output_dir,
            json,
        } => {
            let mut config = match config {
                Some(path) => AnalysisConfig::from_file(&path)?,
                None => AnalysisConfig::default(),
            };
            if let Some(preset) = rule {
                config.rule = RuleConfig::from_preset(preset);
            }
            if from.is_some() || to.is_some() {
                config.seasons = SeasonsConfig {
                    from,
                    to,
                    last: None,
                };
            } else if last.is_some() {
                config.seasons = SeasonsConfig {
                    last,
                    ..SeasonsConfig::default()
                };
            }
            if let Some(mode) = tie_mode {
                config.ranking.tie_mode = mode;
            }
            config.source.offline |= offline;
            if let Some(dir) = data_dir {
                config.source.data_dir = dir;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            config.output.json |= json;
            config.validate()?;
            run_analyze(&config)
        }
        Commands::Show {
            season,
            rule,
            tie_mode,
            data_dir,
        } => run_show(season, rule, tie_mode, data_dir),
    }
}

/// Log to stderr so report text on stdout stays clean.
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let default = match verbose {
        0 => "warn",
        1 => "leaguelab_core=info,leaguelab_runner=info,leaguelab=info,warn",
        _ => "leaguelab_core=debug,leaguelab_runner=debug,leaguelab=debug,info",
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

fn remote_provider(source: &SourceConfig) -> Result<FootballDataProvider> {
    if source.api_token().is_none() {
        warn!(
            env = %source.api_key_env,
            "no API token set; football-data.org may reject requests"
        );
    }
    Ok(FootballDataProvider::new(source.football_data_config())?)
}

fn run_fetch(
    from: i32,
    to: i32,
    competition: String,
    data_dir: PathBuf,
    force: bool,
) -> Result<()> {
    if from > to {
        bail!("--from ({from}) must not be after --to ({to})");
    }

    let source = SourceConfig {
        competition,
        data_dir,
        ..SourceConfig::default()
    };
    let provider = remote_provider(&source)?;
    let files = CsvTableProvider::new(&source.data_dir);
    let seasons: Vec<Season> = (from..=to).map(Season::new).collect();

    let summary = fetch_seasons(&provider, &files, &seasons, force, &StdoutProgress);

    if !summary.all_succeeded() {
        for (season, err) in &summary.errors {
            eprintln!("Error for {season}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_analyze(config: &AnalysisConfig) -> Result<()> {
    let rule = config.rule.to_rule()?;
    let seasons = config.seasons.range()?.resolve();

    let provider = if config.source.offline {
        None
    } else {
        Some(remote_provider(&config.source)?)
    };
    let loader = StandingsLoader::new(
        CsvTableProvider::new(&config.source.data_dir),
        provider.as_ref().map(|p| p as &dyn StandingsProvider),
        LoadOptions {
            offline: config.source.offline,
            force: config.source.force,
            persist: config.source.persist,
        },
    );

    let report = analyze_range(&seasons, &loader, &rule, config.ranking.tie_mode);

    for result in &report.results {
        println!("{}", render_season(result));
        print!("{}", render_movers(result, config.output.movers));
        for path in save_season(result, &config.output)? {
            println!("Saved {}", path.display());
        }
        println!();
    }
    print!("{}", render_summary(&report));

    if report.results.is_empty() {
        bail!("no season could be analyzed");
    }
    info!(analyzed = report.results.len(), "analysis complete");
    Ok(())
}

fn run_show(season: Season, preset: RulePreset, tie_mode: TieMode, data_dir: PathBuf) -> Result<()> {
    let loader = StandingsLoader::offline(CsvTableProvider::new(data_dir));
    let fetched = loader
        .load(season)
        .with_context(|| {
            format!(
                "no persisted table for {season}; run `leaguelab fetch --from {0} --to {0}` first",
                season.start_year
            )
        })?;
    let result = rank_season(season, &fetched.table, &preset.to_rule(), tie_mode)?;

    println!("{}", render_season(&result));
    print!("{}", render_movers(&result, 3));
    Ok(())
}
