//! Canonical record model shared by jobs and papers
//!
//! One schema covers both kinds; the `kind` discriminant tells downstream
//! tools which one they are looking at. Records are created fresh by the
//! normalizer each run and linked across runs by their stable `id`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Discriminant between the two record families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Job,
    Paper,
}

/// One reconciled job posting or paper.
///
/// `first_seen_at` is immutable once set; `last_seen_at` is bumped every run
/// the record reappears; `removed_at` marks a soft-deleted record that is
/// retained in the snapshot so historical links stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub kind: RecordKind,
    pub title: String,
    pub organization_or_venue: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_or_posted_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<DateTime<Utc>>,
    pub source: String,
}

impl Record {
    /// How many optional enrichment fields are populated.
    ///
    /// Used by the reconciler to break ties between in-run duplicates:
    /// the more complete record wins.
    pub fn completeness(&self) -> usize {
        let mut n = 0;
        if self.published_or_posted_date.is_some() {
            n += 1;
        }
        if self.location.is_some() {
            n += 1;
        }
        if !self.tags.is_empty() {
            n += 1;
        }
        if self.remote {
            n += 1;
        }
        n
    }

    /// True when any field the reconciler treats as mutable differs.
    pub fn differs_from(&self, other: &Record) -> bool {
        self.title != other.title
            || self.url != other.url
            || self.tags != other.tags
            || self.published_or_posted_date != other.published_or_posted_date
            || self.location != other.location
            || self.remote != other.remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Record {
        let now = Utc::now();
        Record {
            id: "acme-ml-engineer".into(),
            kind: RecordKind::Job,
            title: "ML Engineer".into(),
            organization_or_venue: "Acme".into(),
            url: "https://acme.example/jobs/1".into(),
            published_or_posted_date: None,
            location: None,
            remote: false,
            tags: BTreeSet::new(),
            score: None,
            first_seen_at: now,
            last_seen_at: now,
            removed_at: None,
            source: "acme".into(),
        }
    }

    #[test]
    fn test_completeness_counts_optional_fields() {
        let mut r = base();
        assert_eq!(r.completeness(), 0);
        r.location = Some("Remote".into());
        r.remote = true;
        assert_eq!(r.completeness(), 2);
        r.published_or_posted_date = NaiveDate::from_ymd_opt(2026, 1, 1);
        r.tags.insert("ml".into());
        assert_eq!(r.completeness(), 4);
    }

    #[test]
    fn test_differs_ignores_timestamps_and_score() {
        let a = base();
        let mut b = base();
        b.score = Some(12.0);
        b.last_seen_at = Utc::now();
        assert!(!a.differs_from(&b));
        b.title = "Senior ML Engineer".into();
        assert!(a.differs_from(&b));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&RecordKind::Paper).unwrap();
        assert_eq!(json, "\"paper\"");
    }
}
