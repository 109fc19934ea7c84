//! Snapshot format: one immutable, timestamped JSON file per run
//!
//! Downstream tools (dashboard, URL opener, email digest) read only this
//! format and never re-derive scoring or dedup logic. Writing lives in the
//! pipeline crate; loading lives here so the tools crate needs nothing else.

use crate::record::Record;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-run reconciliation counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub removed: usize,
}

/// Full reconciled record set plus run metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub source_list: Vec<String>,
    pub counts: ChangeCounts,
    pub records: Vec<Record>,
}

impl Snapshot {
    /// Read a snapshot file written by a previous run.
    pub fn load(path: &Path) -> Result<Snapshot> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Persistence(format!("Failed to read snapshot {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use std::collections::BTreeSet;
    use std::io::Write;

    #[test]
    fn test_snapshot_round_trips_through_file() {
        let now = Utc::now();
        let snapshot = Snapshot {
            generated_at: now,
            source_list: vec!["acme".into()],
            counts: ChangeCounts {
                added: 1,
                ..Default::default()
            },
            records: vec![Record {
                id: "acme-ml-engineer".into(),
                kind: RecordKind::Job,
                title: "ML Engineer".into(),
                organization_or_venue: "Acme".into(),
                url: "https://acme.example/jobs/1".into(),
                published_or_posted_date: None,
                location: Some("Remote".into()),
                remote: true,
                tags: BTreeSet::from(["ml".to_string()]),
                score: Some(12.5),
                first_seen_at: now,
                last_seen_at: now,
                removed_at: None,
                source: "acme".into(),
            }],
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string_pretty(&snapshot).unwrap().as_bytes())
            .unwrap();
        file.flush().unwrap();

        let loaded = Snapshot::load(file.path()).unwrap();
        assert_eq!(loaded.records, snapshot.records);
        assert_eq!(loaded.counts, snapshot.counts);
    }

    #[test]
    fn test_load_missing_file_is_persistence_error() {
        let err = Snapshot::load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
