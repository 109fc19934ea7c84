//! Normalizer: raw adapter records into the canonical schema
//!
//! One arm per raw kind. Required identity fields are checked first; date
//! parsing is best-effort and never fatal. Identity derivation normalizes
//! case and whitespace so formatting noise in source HTML cannot split one
//! real-world entity into two ids.

use crate::sources::{career, RawJob, RawPaper, RawRecord};
use chrono::{DateTime, Utc};
use scout_common::time::parse_date_flex;
use scout_common::{identity, Error, Record, RecordKind, Result};
use std::collections::BTreeSet;

/// Normalize one raw record. `now` seeds the seen-timestamps; the
/// reconciler overwrites them with its own policy.
pub fn normalize(raw: RawRecord, now: DateTime<Utc>) -> Result<Record> {
    match raw {
        RawRecord::Job(job) => normalize_job(job, now),
        RawRecord::Paper(paper) => normalize_paper(paper, now),
    }
}

fn require(field: &str, value: &str, context: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::MalformedRecord(format!(
            "Missing required field '{}' on {}",
            field, context
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_job(job: RawJob, now: DateTime<Utc>) -> Result<Record> {
    let context = format!("job from '{}'", job.source);
    let title = require("title", &job.title, &context)?;
    let url = require("url", &job.url, &context)?;
    let organization = require("organization", &job.company, &context)?;

    let mut tags: BTreeSet<String> = career::matched_keywords(&title)
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(snippet) = &job.snippet {
        tags.extend(career::matched_keywords(snippet).into_iter().map(str::to_string));
    }

    Ok(Record {
        id: identity::job_id(&organization, &title),
        kind: RecordKind::Job,
        title,
        organization_or_venue: organization,
        url,
        published_or_posted_date: None,
        location: job.location.map(|l| l.trim().to_string()).filter(|l| !l.is_empty()),
        remote: job.remote,
        tags,
        score: None,
        first_seen_at: now,
        last_seen_at: now,
        removed_at: None,
        source: job.source,
    })
}

fn normalize_paper(paper: RawPaper, now: DateTime<Utc>) -> Result<Record> {
    let context = format!("paper from '{}'", paper.source);
    let title = require("title", &paper.title, &context)?;
    let url = require("url", &paper.url, &context)?;
    let venue = paper
        .venue
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("Unknown venue")
        .to_string();

    let date = paper.published.as_deref().and_then(parse_date_flex);
    let year = paper.year.or_else(|| {
        date.map(|d| {
            use chrono::Datelike;
            d.year()
        })
    });

    Ok(Record {
        id: identity::paper_id(
            paper.doi.as_deref(),
            &title,
            paper.first_author.as_deref(),
            year,
        ),
        kind: RecordKind::Paper,
        title,
        organization_or_venue: venue,
        url,
        published_or_posted_date: date,
        location: None,
        remote: false,
        tags: paper.topics.iter().map(|t| t.trim().to_lowercase()).collect(),
        score: None,
        first_seen_at: now,
        last_seen_at: now,
        removed_at: None,
        source: paper.source,
    })
}
