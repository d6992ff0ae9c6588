//! wikisignal CLI — replay, inspect, and screen commands.
//!
//! Commands:
//! - `replay` — run the decision rule over a recorded data file and print a report
//! - `inspect` — parse and validate a data file, print stats and its fingerprint
//! - `screen` — apply the coarse universe filter to a daily universe file

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use wikisignal_core::config::RunConfig;
use wikisignal_core::data::{load_universe, UniverseRow};
use wikisignal_core::replay::{run_replay, ReplayFeed, ReplayReport};

#[derive(Parser)]
#[command(
    name = "wikisignal",
    about = "wikisignal CLI — Wikipedia attention signal replay"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the decision rule over a recorded data CSV.
    Replay {
        /// Path to the data CSV (yyyymmdd,views,pct_change_week,pct_change_month).
        #[arg(long)]
        data: PathBuf,

        /// Path to a TOML run config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Equity ticker. Overrides the config.
        #[arg(long)]
        ticker: Option<String>,

        /// Entry threshold in percent. Overrides the config.
        #[arg(long)]
        threshold: Option<f64>,

        /// History lookback in periods. Overrides the config.
        #[arg(long)]
        lookback: Option<usize>,

        /// Replay start date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        start: Option<String>,

        /// Replay end date (YYYY-MM-DD). Overrides the config.
        #[arg(long)]
        end: Option<String>,

        /// Write the full JSON report to this path.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Actions to print from the end of the run (0 = all).
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// Parse and validate a data CSV; print stats and the fingerprint.
    Inspect {
        /// Path to the data CSV.
        #[arg(long)]
        data: PathBuf,
    },
    /// Apply the coarse universe filter to a daily universe CSV.
    Screen {
        /// Path to the universe CSV (security_id,ticker,views,week,month).
        #[arg(long)]
        universe: PathBuf,

        /// Delivery date (YYYY-MM-DD). Defaults to the yyyymmdd file stem.
        #[arg(long)]
        date: Option<String>,

        /// Path to a TOML run config (for [universe] thresholds).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Minimum page views. Overrides the config.
        #[arg(long)]
        min_views: Option<f64>,

        /// Minimum month percent change. Overrides the config.
        #[arg(long)]
        min_month_change: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            data,
            config,
            ticker,
            threshold,
            lookback,
            start,
            end,
            output,
            tail,
        } => run_replay_cmd(data, config, ticker, threshold, lookback, start, end, output, tail),
        Commands::Inspect { data } => run_inspect(&data),
        Commands::Screen { universe, date, config, min_views, min_month_change } => {
            run_screen(&universe, date, config, min_views, min_month_change)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_replay_cmd(
    data: PathBuf,
    config_path: Option<PathBuf>,
    ticker: Option<String>,
    threshold: Option<f64>,
    lookback: Option<usize>,
    start: Option<String>,
    end: Option<String>,
    output: Option<PathBuf>,
    tail: usize,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;

    // Flags override file values
    if let Some(ticker) = ticker {
        config.algorithm.ticker = ticker;
    }
    if let Some(threshold) = threshold {
        config.rule.week_change_threshold_pct = threshold;
    }
    if let Some(lookback) = lookback {
        config.algorithm.history_lookback = lookback;
    }
    if let Some(start) = start.as_deref() {
        config.algorithm.start_date = Some(parse_cli_date(start)?);
    }
    if let Some(end) = end.as_deref() {
        config.algorithm.end_date = Some(parse_cli_date(end)?);
    }
    if let (Some(s), Some(e)) = (config.algorithm.start_date, config.algorithm.end_date) {
        if e < s {
            bail!("--end {e} is before --start {s}");
        }
    }

    let mut feed = ReplayFeed::from_file(&data)
        .with_context(|| format!("failed to load data file {}", data.display()))?;
    let report = run_replay(&config, &mut feed)?;

    print_report(&report, tail);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn run_inspect(data: &Path) -> Result<()> {
    let feed = ReplayFeed::from_file(data)
        .with_context(|| format!("failed to load data file {}", data.display()))?;

    println!("File:           {}", data.display());
    println!("Points:         {}", feed.len());
    if let Some((first, last)) = feed.date_range() {
        println!("Date range:     {first} to {last}");
    }

    if feed.is_empty() {
        println!("Data hash:      {}", feed.data_hash());
        return Ok(());
    }

    let points = feed.points();
    let missing_views = points.iter().filter(|p| p.page_views.is_none()).count();
    let missing_week = points.iter().filter(|p| p.week_percent_change.is_none()).count();
    let missing_month = points.iter().filter(|p| p.month_percent_change.is_none()).count();

    println!();
    println!("{:<18} {:>8}", "Field", "Missing");
    println!("{}", "-".repeat(27));
    println!("{:<18} {:>8}", "views", missing_views);
    println!("{:<18} {:>8}", "pct_change_week", missing_week);
    println!("{:<18} {:>8}", "pct_change_month", missing_month);

    let weeks: Vec<f64> = points.iter().filter_map(|p| p.week_percent_change).collect();
    if !weeks.is_empty() {
        let min = weeks.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = weeks.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = weeks.iter().sum::<f64>() / weeks.len() as f64;
        println!();
        println!("Week change:    min {min:.2}  max {max:.2}  mean {mean:.2}");
    }

    println!();
    println!("Data hash:      {}", feed.data_hash());
    Ok(())
}

fn run_screen(
    universe_path: &Path,
    date: Option<String>,
    config_path: Option<PathBuf>,
    min_views: Option<f64>,
    min_month_change: Option<f64>,
) -> Result<()> {
    let file_date = match date.as_deref() {
        Some(s) => parse_cli_date(s)?,
        None => date_from_stem(universe_path)?,
    };

    let mut filter = load_config(config_path.as_deref())?.universe;
    if let Some(min_views) = min_views {
        filter.min_page_views = min_views;
    }
    if let Some(min_month) = min_month_change {
        filter.min_month_percent_change = min_month;
    }

    let rows = load_universe(universe_path, file_date)
        .with_context(|| format!("failed to load universe file {}", universe_path.display()))?;

    println!("Universe:       {}", universe_path.display());
    println!("Delivery date:  {file_date}");
    if let Some(row) = rows.first() {
        println!("Metric date:    {}", row.date);
    }
    println!("Rows:           {}", rows.len());
    println!(
        "Filter:         views > {} AND month change > {}",
        filter.min_page_views, filter.min_month_percent_change
    );
    println!();

    let selected: Vec<&UniverseRow> = rows.iter().filter(|r| filter.matches(r)).collect();
    if selected.is_empty() {
        println!("No rows selected.");
        return Ok(());
    }

    println!("{:<8} {:>12} {:>10} {:>10}", "Ticker", "Views", "Week %", "Month %");
    println!("{}", "-".repeat(44));
    for row in &selected {
        println!(
            "{:<8} {:>12.0} {:>10} {:>10}",
            row.symbol.ticker,
            row.page_views.unwrap_or(0.0),
            fmt_opt(row.week_percent_change),
            fmt_opt(row.month_percent_change),
        );
    }
    println!();
    println!("Selected {} of {} rows.", selected.len(), rows.len());
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => Ok(RunConfig::from_file(path)?),
        None => Ok(RunConfig::default()),
    }
}

fn parse_cli_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn date_from_stem(path: &Path) -> Result<NaiveDate> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    NaiveDate::parse_from_str(stem, "%Y%m%d").with_context(|| {
        format!("cannot derive a delivery date from '{stem}'; pass --date YYYY-MM-DD")
    })
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".into(),
    }
}

fn print_report(report: &ReplayReport, tail: usize) {
    println!();
    println!("=== Replay Result ===");
    println!("Run ID:         {}", report.run_id);
    println!("Rule:           {}", report.rule);
    println!("Equity:         {}", report.equity);
    println!("Feed:           {}", report.feed);
    match (report.start_date, report.end_date) {
        (Some(start), Some(end)) => println!("Period:         {start} to {end}"),
        _ => println!("Period:         (no data in window)"),
    }
    println!("Slices:         {} ({} points)", report.slice_count, report.point_count);
    println!("History:        {} points returned at startup", report.history_points);
    println!();
    println!("--- Actions ---");
    println!("Entries:        {}", report.entries);
    println!("Liquidations:   {}", report.liquidations);

    let total = report.actions.len();
    let shown = if tail == 0 || tail >= total { total } else { tail };
    if shown < total {
        println!("(last {shown} of {total})");
    }
    for record in &report.actions[total - shown..] {
        println!("  {}  {}", record.date, record.action);
    }

    println!();
    println!("Data hash:      {}", report.data_hash);
}
