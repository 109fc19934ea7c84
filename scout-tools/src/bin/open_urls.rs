//! scout-open - Open snapshot record URLs in the browser
//!
//! Read-only with respect to the snapshot: filters, optionally sorts by
//! score, slices to a 1-based range, and opens what remains.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_common::Snapshot;
use scout_tools::filter;

/// Command-line arguments for scout-open
#[derive(Parser, Debug)]
#[command(name = "scout-open")]
#[command(about = "Open matching record URLs from a snapshot JSON")]
#[command(version)]
struct Args {
    /// Snapshot JSON to read
    #[arg(long, short = 'f')]
    in_json: PathBuf,

    /// Filter titles by substring, case-insensitive
    #[arg(long, short = 'k')]
    keyword: Option<String>,

    /// Open URLs from index START to END (1-based, inclusive)
    #[arg(long, short = 'r', num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<usize>>,

    /// Sort by score descending before slicing
    #[arg(long)]
    sort: bool,

    /// Only print links, don't open the browser
    #[arg(long)]
    dry: bool,
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

    let mut records = filter::live_only(snapshot.records);
    if let Some(keyword) = &args.keyword {
        records = filter::by_keyword(records, keyword);
    }
    if args.sort {
        filter::sort_by_score(&mut records);
    }

    println!("Total records: {}", records.len());
    if let Some(range) = &args.range {
        let (start, end) = (range[0], range[1]);
        records = filter::by_range(records, start, end);
        println!("Opening range {}-{} ({} urls)", start, end, records.len());
    }

    for record in &records {
        println!("-> {}", record.url);
        if !args.dry {
            if let Err(e) = webbrowser::open(&record.url) {
                warn!(url = %record.url, error = %e, "Could not open browser");
            }
        }
    }

    Ok(())
}
