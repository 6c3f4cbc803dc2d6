//! Reporting and export: console text, CSV and JSON artifacts.
//!
//! Persisted JSON carries a `schema_version`; unknown versions are rejected
//! on load. Ranked CSV files keep the raw table columns and append the
//! computed ones, so they open next to the source tables in any tool.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

use leaguelab_core::data::{table_fields, TABLE_HEADER};
use leaguelab_core::domain::{Season, SeasonResult, SCHEMA_VERSION};
use leaguelab_core::engine::{biggest_movers, championship_change};

use crate::config::OutputConfig;
use crate::orchestrator::RangeReport;

// ─── Console ────────────────────────────────────────────────────────

fn format_change(change: i64) -> String {
    if change == 0 {
        "=".to_string()
    } else {
        format!("{change:+}")
    }
}

/// Console table for one season, followed by the championship change line.
pub fn render_season(result: &SeasonResult) -> String {
    let width = result
        .standings
        .iter()
        .map(|t| t.name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Season {} ({}, {} ties)",
        result.season, result.rule, result.tie_mode
    );
    let _ = writeln!(
        out,
        "{:>4}  {:<width$}  {:>6}  {:>8}  {:>6}",
        "Pos", "Team", "Points", "Computed", "Change"
    );
    for team in &result.standings {
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>6}  {:>8}  {:>6}",
            team.new_position,
            team.name(),
            team.record.original_points,
            team.computed_points,
            format_change(team.position_change)
        );
    }

    match championship_change(result) {
        Some(change) => {
            let _ = writeln!(out, "Championship change: {} -> {}", change.original, change.new);
        }
        None => {
            if let Some(champion) = result.new_champion() {
                let _ = writeln!(out, "Champion unchanged: {}", champion.name());
            }
        }
    }
    out
}

/// The `n` biggest movers of a season, one per line.
pub fn render_movers(result: &SeasonResult, n: usize) -> String {
    let movers = biggest_movers(result, n);
    if movers.is_empty() {
        return "No position changes.\n".to_string();
    }
    let mut out = String::from("Biggest movers:\n");
    for team in movers {
        let _ = writeln!(
            out,
            "  {} {} ({} -> {})",
            format_change(team.position_change),
            team.name(),
            team.original_position(),
            team.new_position
        );
    }
    out
}

/// Cross-season summary: coverage, skipped seasons, championship changes.
pub fn render_summary(report: &RangeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Seasons analyzed: {} of {}",
        report.results.len(),
        report.requested()
    );

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "Skipped seasons ({}):", report.skipped.len());
        for skipped in &report.skipped {
            let _ = writeln!(out, "  {}: {}", skipped.season, skipped.reason);
        }
    }

    let changes = report.championship_changes();
    if changes.is_empty() {
        out.push_str("No championship changes.\n");
    } else {
        let _ = writeln!(out, "Championship changes ({}):", changes.len());
        for change in &changes {
            let _ = writeln!(out, "  {}: {} -> {}", change.season, change.original, change.new);
        }
    }
    out
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Ranked season as CSV, rows in new-position order.
///
/// Columns: the raw table header, then ComputedPoints, NewPosition,
/// PositionChange.
pub fn export_season_csv(result: &SeasonResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = TABLE_HEADER.to_vec();
    header.extend(["ComputedPoints", "NewPosition", "PositionChange"]);
    wtr.write_record(&header)?;

    for team in &result.standings {
        let mut row: Vec<String> = table_fields(&team.record).into();
        row.push(team.computed_points.to_string());
        row.push(team.new_position.to_string());
        row.push(team.position_change.to_string());
        wtr.write_record(&row)?;
    }

    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SeasonResult` to pretty JSON.
pub fn export_season_json(result: &SeasonResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SeasonResult to JSON")
}

/// Deserialize a `SeasonResult` from JSON, rejecting unknown schema versions.
pub fn import_season_json(json: &str) -> Result<SeasonResult> {
    let result: SeasonResult =
        serde_json::from_str(json).context("failed to deserialize SeasonResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── Artifacts ──────────────────────────────────────────────────────

/// Write a season's artifacts to `output.dir`.
///
/// CSV goes to `epl<code>ranked.csv`, JSON to `epl<code>ranked.json`.
/// Returns the paths written.
pub fn save_season(result: &SeasonResult, output: &OutputConfig) -> Result<Vec<PathBuf>> {
    let season: Season = result
        .season
        .parse()
        .with_context(|| format!("result has an unparseable season '{}'", result.season))?;
    let dir = output.dir.as_path();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let stem = format!("epl{}ranked", season.code());
    let mut written = Vec::new();

    if output.csv {
        let path = dir.join(format!("{stem}.csv"));
        write_artifact(&path, &export_season_csv(result)?)?;
        written.push(path);
    }
    if output.json {
        let path = dir.join(format!("{stem}.json"));
        write_artifact(&path, &export_season_json(result)?)?;
        written.push(path);
    }
    Ok(written)
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote artifact");
    Ok(())
}
