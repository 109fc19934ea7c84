//! Reconciler: merge newly normalized records against the previous snapshot
//!
//! Identity (`id`) links a record across runs. New ids are added, matched
//! ids keep their `first_seen_at` and have mutable fields overwritten, and
//! ids that vanished from the fetch are soft-deleted with `removed_at`
//! rather than dropped, so historical links in dashboards and sent emails
//! stay valid. The previous snapshot is read-only input.

use chrono::{DateTime, Utc};
use scout_common::snapshot::ChangeCounts;
use scout_common::Record;
use std::collections::BTreeMap;

/// Outcome of one reconciliation pass
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// Full merged record set, including soft-deleted history
    pub records: Vec<Record>,
    pub counts: ChangeCounts,
}

/// Collapse in-run duplicates sharing an id: the record with more optional
/// fields populated wins, and a tie keeps the first one encountered.
/// Deterministic for a fixed input order.
fn dedupe_within_run(new_records: Vec<Record>) -> BTreeMap<String, Record> {
    let mut by_id: BTreeMap<String, Record> = BTreeMap::new();
    for record in new_records {
        match by_id.get(&record.id) {
            Some(existing) if record.completeness() <= existing.completeness() => {
                tracing::debug!(id = %record.id, "Dropping less complete in-run duplicate");
            }
            _ => {
                by_id.insert(record.id.clone(), record);
            }
        }
    }
    by_id
}

/// Merge `new_records` against `previous`, stamping `now` on everything
/// seen this run.
pub fn reconcile(
    previous: &[Record],
    new_records: Vec<Record>,
    now: DateTime<Utc>,
) -> ReconcileOutcome {
    let mut fresh = dedupe_within_run(new_records);
    let mut counts = ChangeCounts::default();
    let mut merged: Vec<Record> = Vec::with_capacity(previous.len() + fresh.len());

    for prior in previous {
        match fresh.remove(&prior.id) {
            Some(mut incoming) => {
                // Reappearance clears a past soft delete
                let reappeared = prior.removed_at.is_some();
                if incoming.differs_from(prior) || reappeared {
                    counts.updated += 1;
                } else {
                    counts.unchanged += 1;
                }
                incoming.first_seen_at = prior.first_seen_at;
                incoming.last_seen_at = now;
                incoming.removed_at = None;
                merged.push(incoming);
            }
            None => {
                if prior.removed_at.is_some() {
                    // Already soft-deleted in an earlier run; carry as-is
                    merged.push(prior.clone());
                } else {
                    counts.removed += 1;
                    let mut gone = prior.clone();
                    gone.removed_at = Some(now);
                    merged.push(gone);
                }
            }
        }
    }

    for (_, mut record) in fresh {
        counts.added += 1;
        record.first_seen_at = now;
        record.last_seen_at = now;
        record.removed_at = None;
        merged.push(record);
    }

    tracing::info!(
        added = counts.added,
        updated = counts.updated,
        unchanged = counts.unchanged,
        removed = counts.removed,
        "Reconciliation complete"
    );

    ReconcileOutcome {
        records: merged,
        counts,
    }
}

/// Drop soft-deleted records whose removal predates `removed_before`.
///
/// Retention is unbounded by default; this is the explicit pruning step and
/// nothing in the pipeline calls it automatically.
pub fn prune(records: Vec<Record>, removed_before: DateTime<Utc>) -> Vec<Record> {
    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| match r.removed_at {
            Some(at) => at >= removed_before,
            None => true,
        })
        .collect();
    if kept.len() < before {
        tracing::info!(pruned = before - kept.len(), "Pruned soft-deleted records");
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use scout_common::RecordKind;
    use std::collections::BTreeSet;

    fn record(id: &str, title: &str) -> Record {
        let t0 = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        Record {
            id: id.into(),
            kind: RecordKind::Job,
            title: title.into(),
            organization_or_venue: "Acme".into(),
            url: format!("https://acme.example/jobs/{}", id),
            published_or_posted_date: None,
            location: None,
            remote: false,
            tags: BTreeSet::new(),
            score: None,
            first_seen_at: t0,
            last_seen_at: t0,
            removed_at: None,
            source: "acme".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_added_and_unchanged() {
        // previous snapshot holds the acme job; the new fetch repeats it and
        // brings one new posting
        let previous = vec![record("acme-ml-engineer", "ML Engineer")];
        let fetched = vec![
            record("acme-ml-engineer", "ML Engineer"),
            record("beta-research-engineer", "Research Engineer"),
        ];

        let outcome = reconcile(&previous, fetched, now());

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.counts.added, 1);
        assert_eq!(outcome.counts.updated, 0);
        assert_eq!(outcome.counts.unchanged, 1);
        assert_eq!(outcome.counts.removed, 0);
    }

    #[test]
    fn test_updated_preserves_first_seen() {
        let previous = vec![record("acme-ml-engineer", "ML Engineer")];
        let mut changed = record("acme-ml-engineer", "ML Engineer");
        changed.url = "https://acme.example/jobs/relocated".into();
        changed.first_seen_at = now();

        let outcome = reconcile(&previous, vec![changed], now());

        assert_eq!(outcome.counts.updated, 1);
        let merged = &outcome.records[0];
        assert_eq!(merged.first_seen_at, previous[0].first_seen_at);
        assert_eq!(merged.last_seen_at, now());
        assert_eq!(merged.url, "https://acme.example/jobs/relocated");
    }

    #[test]
    fn test_unchanged_still_bumps_last_seen() {
        let previous = vec![record("acme-ml-engineer", "ML Engineer")];
        let outcome = reconcile(&previous, vec![record("acme-ml-engineer", "ML Engineer")], now());
        assert_eq!(outcome.counts.unchanged, 1);
        assert_eq!(outcome.records[0].last_seen_at, now());
    }

    #[test]
    fn test_vanished_record_is_soft_deleted() {
        let previous = vec![record("acme-ml-engineer", "ML Engineer")];
        let outcome = reconcile(&previous, vec![], now());

        assert_eq!(outcome.counts.removed, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].removed_at, Some(now()));
    }

    #[test]
    fn test_already_removed_not_recounted() {
        let mut gone = record("acme-ml-engineer", "ML Engineer");
        let earlier = Utc.with_ymd_and_hms(2026, 8, 10, 0, 0, 0).unwrap();
        gone.removed_at = Some(earlier);

        let outcome = reconcile(&[gone], vec![], now());

        assert_eq!(outcome.counts.removed, 0);
        // original removal timestamp is history, not rewritten
        assert_eq!(outcome.records[0].removed_at, Some(earlier));
    }

    #[test]
    fn test_reappearance_clears_removed_and_counts_updated() {
        let mut gone = record("acme-ml-engineer", "ML Engineer");
        gone.removed_at = Some(Utc.with_ymd_and_hms(2026, 8, 10, 0, 0, 0).unwrap());

        let outcome = reconcile(&[gone], vec![record("acme-ml-engineer", "ML Engineer")], now());

        assert_eq!(outcome.counts.updated, 1);
        assert_eq!(outcome.records[0].removed_at, None);
    }

    #[test]
    fn test_in_run_duplicate_more_complete_wins() {
        let bare = record("acme-ml-engineer", "ML Engineer");
        let mut rich = record("acme-ml-engineer", "ML Engineer");
        rich.location = Some("Remote".into());

        // order must not matter
        let a = reconcile(&[], vec![bare.clone(), rich.clone()], now());
        let b = reconcile(&[], vec![rich.clone(), bare.clone()], now());

        assert_eq!(a.records.len(), 1);
        assert_eq!(a.records[0].location.as_deref(), Some("Remote"));
        assert_eq!(b.records[0].location.as_deref(), Some("Remote"));
        assert_eq!(a.counts.added, 1);
    }

    #[test]
    fn test_in_run_duplicate_tie_keeps_first() {
        let mut first = record("acme-ml-engineer", "ML Engineer");
        first.url = "https://acme.example/jobs/first".into();
        let mut second = record("acme-ml-engineer", "ML Engineer");
        second.url = "https://acme.example/jobs/second".into();

        let outcome = reconcile(&[], vec![first, second], now());
        assert_eq!(outcome.records[0].url, "https://acme.example/jobs/first");
    }

    #[test]
    fn test_prune_drops_only_old_removals() {
        let live = record("acme-ml-engineer", "ML Engineer");
        let mut old_gone = record("beta-research-engineer", "Research Engineer");
        old_gone.removed_at = Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        let mut recent_gone = record("gamma-scientist", "Scientist");
        recent_gone.removed_at = Some(Utc.with_ymd_and_hms(2026, 8, 20, 0, 0, 0).unwrap());

        let cutoff = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let kept = prune(vec![live, old_gone, recent_gone], cutoff);

        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["acme-ml-engineer", "gamma-scientist"]);
    }

    #[test]
    fn test_idempotent_second_run() {
        let fetched = vec![
            record("acme-ml-engineer", "ML Engineer"),
            record("beta-research-engineer", "Research Engineer"),
        ];

        let first = reconcile(&[], fetched.clone(), now());
        let later = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
        let second = reconcile(&first.records, fetched, later);

        assert_eq!(second.counts.added, 0);
        assert_eq!(second.counts.updated, 0);
        assert_eq!(second.counts.unchanged, 2);

        // record sets match once last_seen_at is masked out
        let mut a = first.records.clone();
        let mut b = second.records.clone();
        for r in a.iter_mut().chain(b.iter_mut()) {
            r.last_seen_at = now();
        }
        a.sort_by(|x, y| x.id.cmp(&y.id));
        b.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(a, b);
    }
}
