//! Record filtering and ordering shared by the snapshot consumers

use scout_common::Record;

/// Keep records whose title contains `keyword`, case-insensitively.
pub fn by_keyword(records: Vec<Record>, keyword: &str) -> Vec<Record> {
    let needle = keyword.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .collect()
}

/// Slice records to a 1-based inclusive index range.
///
/// Out-of-bounds ends clamp instead of erroring, matching how people use
/// `-r 1 10` against a list that turned out shorter.
pub fn by_range(records: Vec<Record>, start: usize, end: usize) -> Vec<Record> {
    let start = start.saturating_sub(1);
    let end = end.min(records.len());
    if start >= end {
        return Vec::new();
    }
    records
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect()
}

/// Stable sort by score, highest first. Unscored records sink to the end.
pub fn sort_by_score(records: &mut [Record]) {
    records.sort_by(|a, b| {
        let a = a.score.unwrap_or(f64::NEG_INFINITY);
        let b = b.score.unwrap_or(f64::NEG_INFINITY);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Drop soft-deleted records, the default view for every consumer.
pub fn live_only(records: Vec<Record>) -> Vec<Record> {
    records.into_iter().filter(|r| r.removed_at.is_none()).collect()
}
