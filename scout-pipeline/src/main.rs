//! scout-pipeline - Aggregation pipeline entry point
//!
//! Fetches job postings and papers from the configured sources, reconciles
//! them against the latest snapshot, scores the merged set, and writes a
//! new timestamped snapshot. Exit code 0 means a snapshot was produced,
//! even when some sources failed; only an all-sources failure or a fatal
//! I/O error is non-zero.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_pipeline::pipeline::{self, PipelineConfig};
use scout_pipeline::score::ScoreRules;
use scout_pipeline::sources;

/// Command-line arguments for scout-pipeline
#[derive(Parser, Debug)]
#[command(name = "scout-pipeline")]
#[command(about = "Aggregate job postings and papers into a scored snapshot")]
#[command(version)]
struct Args {
    /// Directory holding the snapshot series
    #[arg(long, default_value = "snapshots", env = "SCOUT_SNAPSHOT_DIR")]
    snapshot_dir: PathBuf,

    /// Write the snapshot to this exact path instead of a timestamped name
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Only include papers published on or after this date (YYYY-MM-DD).
    /// Default: 365 days ago.
    #[arg(long)]
    from_date: Option<NaiveDate>,

    /// Max number of papers per tracked author
    #[arg(long, default_value = "10")]
    max_papers: usize,

    /// TOML file overriding the built-in score rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// People roster for the OpenAlex source
    #[arg(long, default_value = "data/people.json", env = "SCOUT_PEOPLE_JSON")]
    people_json: PathBuf,

    /// Comma-separated source ids to run (default: all)
    #[arg(long, value_delimiter = ',')]
    sources: Vec<String>,

    /// Concurrent fetch task limit
    #[arg(long, default_value = "4")]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let from_date = args
        .from_date
        .unwrap_or_else(|| (Utc::now() - Duration::days(365)).date_naive());
    info!("Using from_date = {}", from_date);

    let rules = match &args.rules {
        Some(path) => ScoreRules::load(path)
            .with_context(|| format!("Failed to load score rules from {}", path.display()))?,
        None => ScoreRules::default(),
    };

    let mut source_set = sources::default_sources(&args.people_json);
    if !args.sources.is_empty() {
        source_set.retain(|s| args.sources.iter().any(|wanted| wanted == s.id()));
        if source_set.is_empty() {
            anyhow::bail!("No configured source matches {:?}", args.sources);
        }
    }
    info!("Running {} sources", source_set.len());

    let config = PipelineConfig {
        snapshot_dir: args.snapshot_dir,
        out_json: args.out_json,
        from_date,
        max_papers: args.max_papers,
        sources: source_set,
        rules,
        worker_limit: args.workers,
        min_interval_ms: 500,
    };

    let summary = pipeline::run(&config).await.context("Pipeline run failed")?;

    for report in &summary.sources {
        match &report.error {
            Some(error) => warn!(source = %report.source, %error, "Source failed"),
            None => info!(source = %report.source, fetched = report.fetched, "Source OK"),
        }
    }
    for skip in &summary.skipped {
        info!(source = %skip.source, reason = %skip.reason, "Skipped item");
    }
    info!(
        added = summary.counts.added,
        updated = summary.counts.updated,
        unchanged = summary.counts.unchanged,
        removed = summary.counts.removed,
        skipped = summary.skipped.len(),
        "Run complete"
    );
    println!("Snapshot written to {}", summary.snapshot_path.display());

    Ok(())
}
