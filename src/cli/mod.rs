//! CLI command implementations for trendlens.
//!
//! Provides subcommand handlers for:
//! - `trendlens weeks`: list the week catalog
//! - `trendlens uptrends`: run one uptrends query and print the rows
//! - `trendlens series TERM`: chart one term's rank history
//! - `trendlens reindex`: rebuild the backend index
//! - `trendlens dash`: interactive dashboard shell
//! - `trendlens config show|init|set|reset`: configuration management
//!
//! One-shot commands drive the same [`App`] the shell does, so filter
//! persistence, demo limits and validation behave identically.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use colored::Colorize;

use crate::app::{App, Completion, Event};
use crate::chart::{self, ChartGeometry};
use crate::client::{Backend, HttpBackend};
use crate::config::{self, Mode, TrendlensConfig};
use crate::model::{UptrendRow, Week};
use crate::range;
use crate::shell;
use crate::sort::{SortDir, SortKey, SortState};
use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::table::TableModel;
use crate::ui::ElementId;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// The dashboard as the binary runs it.
pub type DashApp = App<HttpBackend, Box<dyn Storage>>;

/// Build an [`App`] from the resolved configuration.
pub fn build_app(cfg: &TrendlensConfig) -> DashApp {
    let backend = HttpBackend::from_config(&cfg.backend);
    let storage: Box<dyn Storage> = if cfg.storage.persist {
        Box::new(FileStorage::open_default())
    } else {
        Box::new(MemoryStorage::default())
    };
    App::new(backend, storage, cfg.dashboard.clone())
}

/// Load the catalog and apply the configured mode, as at startup but
/// without running the default query.
fn prepare(app: &mut DashApp) -> Result<()> {
    app.load_weeks().context("Failed to load weeks.")?;
    app.apply_mode_limits();
    app.run_deferred();
    Ok(())
}

/// Turn the diagnostics of a failed operation into an error.
fn check_console<B: Backend, S: Storage>(app: &mut App<B, S>, fallback: &str) -> Result<()> {
    let Some(detail) = app.take_console().pop() else {
        return Ok(());
    };
    let message = app.toast().message().unwrap_or(fallback).to_string();
    if detail.ends_with(&message) {
        return Err(anyhow!(detail));
    }
    Err(anyhow!(detail).context(message))
}

// ---------------------------------------------------------------------------
// trendlens weeks
// ---------------------------------------------------------------------------

/// List the week catalog.
pub fn run_weeks(cfg: &TrendlensConfig, format: OutputFormat) -> Result<()> {
    let backend = HttpBackend::from_config(&cfg.backend);
    let weeks = backend
        .weeks()
        .with_context(|| format!("Failed to load weeks from {}", backend.base_url()))?;

    if weeks.is_empty() {
        println!("{}", "The backend has no weeks indexed yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&weeks)?),
        OutputFormat::Csv => print_weeks_csv(&weeks),
        OutputFormat::Table => print_weeks_table(&weeks),
    }
    Ok(())
}

fn print_weeks_table(weeks: &[Week]) {
    println!("{}", "Week Catalog".bold().cyan());
    println!("{}", "=".repeat(40));
    println!("  {:>8}  {}", "Id", "Label");
    println!("  {}", "-".repeat(38));
    for (i, week) in weeks.iter().enumerate() {
        let line = format!("  {:>8}  {}", week.week_id, week.option_label());
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    println!();
    println!("  {} {}", "Total:".bold(), weeks.len());
}

fn print_weeks_csv(weeks: &[Week]) {
    println!("week_id,label");
    for week in weeks {
        println!("{},{}", week.week_id, csv_field(&week.label));
    }
}

// ---------------------------------------------------------------------------
// trendlens uptrends
// ---------------------------------------------------------------------------

/// Filter and sort options for `trendlens uptrends`.
#[derive(Debug, Clone, Default)]
pub struct UptrendsArgs {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// Run one uptrends query. Unset filters fall back to the saved selection,
/// then to the default window.
pub fn run_uptrends(
    cfg: &TrendlensConfig,
    args: &UptrendsArgs,
    format: OutputFormat,
) -> Result<()> {
    let sort = sort_state(args.sort.as_deref(), args.dir.as_deref())?;
    let mut app = build_app(cfg);
    prepare(&mut app)?;

    apply_range_args(&mut app, args.start, args.end);
    let wants_terms = args.include.is_some() || args.exclude.is_some();
    if wants_terms && app.controls().include.disabled {
        eprintln!(
            "{} term filters are available in Pro; ignoring --include/--exclude",
            "note:".yellow().bold()
        );
    }
    if let Some(include) = &args.include {
        app.handle(Event::Input(ElementId::IncludeInput, include.clone()));
    }
    if let Some(exclude) = &args.exclude {
        app.handle(Event::Input(ElementId::ExcludeInput, exclude.clone()));
    }
    app.set_sort(sort);

    if app.run_query() != Completion::Applied {
        check_console(&mut app, "Query failed.")?;
    }

    match format {
        OutputFormat::Json => print_uptrends_json(&app)?,
        OutputFormat::Csv => print_uptrends_csv(app.rows()),
        OutputFormat::Table => {
            println!("{}", "Uptrends".bold().cyan());
            println!("  {}", app.range_badge().dimmed());
            println!("{}", "=".repeat(72));
            print_results(app.table(), app.sort_state(), None, usize::MAX);
        }
    }
    Ok(())
}

/// Resolve `--sort`/`--dir` over the default ordering.
fn sort_state(key: Option<&str>, dir: Option<&str>) -> Result<SortState> {
    let default = SortState::default();
    let key = match key {
        Some(key) => key.parse::<SortKey>().map_err(anyhow::Error::msg)?,
        None => default.key,
    };
    let dir = match dir {
        Some(dir) => dir.parse::<SortDir>().map_err(anyhow::Error::msg)?,
        None => default.dir,
    };
    Ok(SortState { key, dir })
}

fn apply_range_args<B: Backend, S: Storage>(
    app: &mut App<B, S>,
    start: Option<i64>,
    end: Option<i64>,
) {
    if let Some(start) = start {
        app.handle(Event::Input(ElementId::StartSelect, start.to_string()));
    }
    if let Some(end) = end {
        app.handle(Event::Input(ElementId::EndSelect, end.to_string()));
    }
}

fn print_uptrends_json(app: &DashApp) -> Result<()> {
    let range = app.table().range.as_ref();
    let value = serde_json::json!({
        "range": range.map(|r| serde_json::json!({
            "startWeekId": r.start,
            "endWeekId": r.end,
            "startLabel": r.start_label,
            "endLabel": r.end_label,
            "weeks": r.week_count,
        })),
        "sort": {
            "key": app.sort_state().key.as_str(),
            "dir": app.sort_state().dir.to_string(),
        },
        "rows": app.rows(),
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_uptrends_csv(rows: &[UptrendRow]) {
    println!("term,start_rank,end_rank,total_improvement,weeks");
    for row in rows {
        println!(
            "{},{},{},{},{}",
            csv_field(&row.term),
            row.start_rank,
            row.end_rank,
            row.total_improvement,
            row.weeks,
        );
    }
}

/// Print the results table. `focused` marks a row with a cursor; at most
/// `limit` rows are shown.
pub fn print_results(
    table: &TableModel,
    sort: SortState,
    focused: Option<ElementId>,
    limit: usize,
) {
    if table.shows_empty_state() {
        println!("  {}", "No results for this range.".yellow());
        println!("  {}", table.found_label().bold());
        return;
    }

    let headers: Vec<String> = SortKey::ALL
        .iter()
        .zip(TableModel::headers())
        .map(|(key, header)| {
            if *key == sort.key {
                let arrow = if sort.dir == SortDir::Asc { "▲" } else { "▼" };
                format!("{header}{arrow}")
            } else {
                header.to_string()
            }
        })
        .collect();
    println!(
        "  {:>4} {:<30} {:>8} {:>8} {:>12} {:>6}",
        "#", headers[0], headers[1], headers[2], headers[3], headers[4]
    );
    println!("  {}", "-".repeat(72));

    for (i, row) in table.rows.iter().take(limit).enumerate() {
        let cursor = if focused == Some(ElementId::Row(i)) { "›" } else { " " };
        let line = format!(
            "{cursor} {:>4} {:<30} {:>8} {:>8} {:>12} {:>6}",
            i + 1,
            truncate(&row.cells[0], 30),
            row.cells[1],
            row.cells[2],
            row.cells[3],
            row.cells[4],
        );
        if focused == Some(ElementId::Row(i)) {
            println!("{}", line.bold());
        } else if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
    if table.rows.len() > limit {
        println!(
            "  {}",
            format!("… {} more rows", table.rows.len() - limit).dimmed()
        );
    }
    println!();
    println!("  {}", table.found_label().bold());
}

// ---------------------------------------------------------------------------
// trendlens series
// ---------------------------------------------------------------------------

/// Chart one term's rank history over a week range.
pub fn run_series(
    cfg: &TrendlensConfig,
    term: &str,
    start: Option<i64>,
    end: Option<i64>,
    svg: Option<&Path>,
) -> Result<()> {
    let mut app = build_app(cfg);
    prepare(&mut app)?;
    apply_range_args(&mut app, start, end);

    let range = range::parse_range(
        app.controls().start.value(),
        app.controls().end.value(),
        app.weeks(),
    )?;
    if app.show_series(term, &range) != Completion::Applied {
        check_console(&mut app, "Failed to load series.")?;
    }

    println!("{}", app.modal().title.bold().cyan());
    println!("  {}", range.badge().dimmed());
    println!("{}", "=".repeat(60));
    if let Some(geometry) = app.chart() {
        print_chart(geometry, 56, 10);
    }

    if let Some(path) = svg {
        fs::write(path, &app.modal().body)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        println!();
        println!("{} Chart written to {}", "✓".green().bold(), path.display());
    }
    Ok(())
}

/// Print the terminal preview of a chart plus the per-week ranks.
pub fn print_chart(geometry: &ChartGeometry, cols: usize, rows: usize) {
    for line in chart::render_preview(geometry, cols, rows) {
        println!("  {line}");
    }
    let ranks: Vec<String> = geometry
        .points
        .iter()
        .map(|p| match p.tooltip() {
            Some(tip) => tip,
            None => format!("{} • -", p.week_label),
        })
        .collect();
    if !ranks.is_empty() {
        println!();
        println!("  {}", ranks.join("   ").dimmed());
    }
}

// ---------------------------------------------------------------------------
// trendlens reindex
// ---------------------------------------------------------------------------

/// Ask the backend to rebuild its index, then reload the catalog.
pub fn run_reindex(cfg: &TrendlensConfig) -> Result<()> {
    let mut app = build_app(cfg);
    app.reindex();
    check_console(&mut app, "Reindex failed.")?;
    println!(
        "{} {} {} weeks indexed",
        "✓".green().bold(),
        app.toast().message().unwrap_or("Reindex completed."),
        app.weeks().len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// trendlens dash
// ---------------------------------------------------------------------------

/// Start the interactive dashboard. `mode` overrides the configured mode.
pub fn run_dash(cfg: &TrendlensConfig, mode: Option<&str>) -> Result<()> {
    let mut cfg = cfg.clone();
    if let Some(mode) = mode {
        cfg.dashboard.mode = parse_mode_arg(mode)?;
    }
    let mut app = build_app(&cfg);
    shell::run(&mut app)
}

fn parse_mode_arg(value: &str) -> Result<Mode> {
    config::parse_mode(value)
        .ok_or_else(|| anyhow!("unknown mode '{value}' (expected demo or pro)"))
}

// ---------------------------------------------------------------------------
// trendlens config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective trendlens Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.trendlens/config.toml");
    print_source(project_exists, ".trendlens.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "TRENDLENS_* environment variables".dimmed()
    );
    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.trendlens/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    println!("  {}", "Edit the file to point trendlens at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("wärmepumpe", 4), "wär…");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("solar"), "solar");
        assert_eq!(csv_field("a, b"), "\"a, b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn test_sort_state_defaults_and_overrides() {
        assert_eq!(sort_state(None, None).unwrap(), SortState::default());
        let state = sort_state(Some("term"), Some("asc")).unwrap();
        assert_eq!(state.key, SortKey::Term);
        assert_eq!(state.dir, SortDir::Asc);
        assert!(sort_state(Some("volume"), None).is_err());
        assert!(sort_state(None, Some("sideways")).is_err());
    }

    #[test]
    fn test_parse_mode_arg() {
        assert_eq!(parse_mode_arg("pro").unwrap(), Mode::Pro);
        assert!(parse_mode_arg("enterprise").is_err());
    }
}
