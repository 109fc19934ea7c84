//! Pipeline orchestrator: one run from fetch to written snapshot
//!
//! Adapter fetches run as independent tokio tasks bounded by a worker
//! limit; one source's failure is recorded in the run summary and never
//! aborts the others. The run is fatal only when zero sources succeed or
//! the snapshot cannot be persisted. The assembly stage
//! (normalize -> reconcile -> score) is pure and split out for tests.

use crate::client::HttpClient;
use crate::normalize::normalize;
use crate::reconcile::reconcile;
use crate::score::ScoreRules;
use crate::snapshot::{load_previous, write_snapshot, write_snapshot_to};
use crate::sources::{FetchOptions, FetchOutcome, Skip, SourceConfig};
use chrono::{DateTime, NaiveDate, Utc};
use scout_common::{Error, Record, Result, Snapshot};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Everything one run needs, built once at process start
#[derive(Debug)]
pub struct PipelineConfig {
    /// Directory holding the append-only snapshot series
    pub snapshot_dir: PathBuf,
    /// Explicit output path overriding the timestamped name
    pub out_json: Option<PathBuf>,
    pub from_date: NaiveDate,
    pub max_papers: usize,
    pub sources: Vec<SourceConfig>,
    pub rules: ScoreRules,
    /// Concurrent fetch task bound, respecting per-site politeness
    pub worker_limit: usize,
    /// Minimum interval between HTTP requests
    pub min_interval_ms: u64,
}

/// Per-source outcome line in the run summary
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// What the caller learns about one completed run
#[derive(Debug)]
pub struct RunSummary {
    pub snapshot_path: PathBuf,
    pub counts: scout_common::ChangeCounts,
    pub sources: Vec<SourceReport>,
    pub skipped: Vec<Skip>,
}

/// Execute one full pipeline run.
pub async fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let client = Arc::new(HttpClient::new(config.min_interval_ms)?);
    let opts = FetchOptions {
        from_date: config.from_date,
        max_papers: config.max_papers,
    };
    let semaphore = Arc::new(Semaphore::new(config.worker_limit.max(1)));

    // One supervised task per source; join failures stay per-source
    let mut handles = Vec::with_capacity(config.sources.len());
    for source in config.sources.iter().cloned() {
        let client = Arc::clone(&client);
        let opts = opts.clone();
        let semaphore = Arc::clone(&semaphore);
        let id = source.id().to_string();
        let handle = tokio::spawn(async move {
            let _permit =
                semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| Error::SourceUnavailable {
                        source: source.id().to_string(),
                        reason: "worker pool closed".into(),
                    })?;
            tracing::info!(source = %source.id(), "Fetching source");
            source.fetch(&client, &opts).await
        });
        handles.push((id, handle));
    }

    let mut fetched: Vec<(String, Result<FetchOutcome>)> = Vec::with_capacity(handles.len());
    for (id, handle) in handles {
        let outcome = match handle.await {
            Ok(result) => result,
            Err(join_err) => Err(Error::SourceUnavailable {
                source: id.clone(),
                reason: format!("Fetch task failed: {}", join_err),
            }),
        };
        fetched.push((id, outcome));
    }

    let now = Utc::now();
    let previous = load_previous(&config.snapshot_dir)?;
    let (snapshot, sources, skipped) = assemble(&previous, fetched, &config.rules, now)?;

    let snapshot_path = match &config.out_json {
        Some(path) => {
            write_snapshot_to(path, &snapshot)?;
            path.clone()
        }
        None => write_snapshot(&config.snapshot_dir, &snapshot)?,
    };

    Ok(RunSummary {
        snapshot_path,
        counts: snapshot.counts,
        sources,
        skipped,
    })
}

/// The pure assembly stage: normalize, reconcile against the previous
/// record set, score, and package a snapshot.
///
/// Fails only when every source failed; per-source errors and per-item
/// skips are carried through to the summary.
pub fn assemble(
    previous: &[Record],
    fetched: Vec<(String, Result<FetchOutcome>)>,
    rules: &ScoreRules,
    now: DateTime<Utc>,
) -> Result<(Snapshot, Vec<SourceReport>, Vec<Skip>)> {
    let mut sources = Vec::with_capacity(fetched.len());
    let mut skipped = Vec::new();
    let mut raw = Vec::new();
    let mut any_ok = false;

    for (id, outcome) in fetched {
        match outcome {
            Ok(mut outcome) => {
                any_ok = true;
                sources.push(SourceReport {
                    source: id,
                    fetched: outcome.raw.len(),
                    error: None,
                });
                raw.append(&mut outcome.raw);
                skipped.append(&mut outcome.skipped);
            }
            Err(e) => {
                tracing::warn!(source = %id, error = %e, "Source failed; continuing without it");
                sources.push(SourceReport {
                    source: id,
                    fetched: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if !any_ok {
        let reasons: Vec<String> = sources
            .iter()
            .filter_map(|s| s.error.as_ref().map(|e| format!("{}: {}", s.source, e)))
            .collect();
        return Err(Error::AllSourcesFailed(reasons.join("; ")));
    }

    let mut normalized = Vec::with_capacity(raw.len());
    for item in raw {
        let source = item.source().to_string();
        match normalize(item, now) {
            Ok(record) => normalized.push(record),
            Err(e) => skipped.push(Skip {
                source,
                reason: e.to_string(),
            }),
        }
    }

    let outcome = reconcile(previous, normalized, now);

    let today = now.date_naive();
    let mut records = outcome.records;
    for record in &mut records {
        record.score = Some(rules.score(record, today));
    }

    let snapshot = Snapshot {
        generated_at: now,
        source_list: sources.iter().map(|s| s.source.clone()).collect(),
        counts: outcome.counts,
        records,
    };
    Ok((snapshot, sources, skipped))
}
