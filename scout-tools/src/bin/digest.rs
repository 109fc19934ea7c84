//! scout-digest - Email the top records from a snapshot
//!
//! SMTP settings come from the environment, validated up front; a missing
//! credential fails here rather than after the fetch-and-format work.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_common::config::SmtpConfig;
use scout_common::Snapshot;
use scout_tools::{email, filter};

/// Command-line arguments for scout-digest
#[derive(Parser, Debug)]
#[command(name = "scout-digest")]
#[command(about = "Send a score-sorted email digest of a snapshot")]
#[command(version)]
struct Args {
    /// Snapshot JSON to read
    #[arg(long)]
    in_json: PathBuf,

    /// Recipient address
    #[arg(long, env = "SCOUT_DIGEST_TO")]
    to: String,

    /// Subject line
    #[arg(long, default_value = "Daily research & job scout digest")]
    subject: String,

    /// Max entries in the digest body
    #[arg(long, default_value = "50")]
    limit: usize,
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

    // Fail on missing credentials before doing any other work
    let smtp = SmtpConfig::from_env().context("SMTP configuration incomplete")?;

    let snapshot = Snapshot::load(&args.in_json)
        .with_context(|| format!("Failed to load snapshot {}", args.in_json.display()))?;

    let mut records = filter::live_only(snapshot.records);
    filter::sort_by_score(&mut records);

    email::send_digest(&records, &args.to, &args.subject, args.limit, &smtp)
        .context("Digest delivery failed")?;

    info!(to = %args.to, "Digest delivered");
    println!("Digest sent to {}", args.to);
    Ok(())
}
