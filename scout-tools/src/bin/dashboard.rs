//! scout-dashboard - Static HTML dashboard from a snapshot

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_common::Snapshot;
use scout_tools::{filter, html};

/// Command-line arguments for scout-dashboard
#[derive(Parser, Debug)]
#[command(name = "scout-dashboard")]
#[command(about = "Render a snapshot JSON into a static HTML dashboard")]
#[command(version)]
struct Args {
    /// Snapshot JSON to render
    #[arg(long)]
    in_json: PathBuf,

    /// Output HTML path
    #[arg(long, default_value = "dashboard.html")]
    out_html: PathBuf,

    /// Include soft-deleted records (dimmed) instead of hiding them
    #[arg(long)]
    include_removed: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout_tools=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let snapshot = Snapshot::load(&args.in_json)
        .with_context(|| format!("Failed to load snapshot {}", args.in_json.display()))?;

    let mut records = snapshot.records.clone();
    if !args.include_removed {
        records = filter::live_only(records);
    }
    filter::sort_by_score(&mut records);

    let page = html::render_dashboard(&snapshot, &records);
    std::fs::write(&args.out_html, page)
        .with_context(|| format!("Failed to write {}", args.out_html.display()))?;

    info!(records = records.len(), out = %args.out_html.display(), "Dashboard written");
    println!("Dashboard written to {}", args.out_html.display());
    Ok(())
}
