//! Static HTML dashboard rendering
//!
//! Pure presentation over a loaded snapshot: a score-sorted table with a
//! kind badge per row and the run metadata in the header. No state, no
//! write-back to the snapshot.

use scout_common::{Record, RecordKind, Snapshot};

/// Minimal escaping for text interpolated into the page.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn kind_badge(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Job => "job",
        RecordKind::Paper => "paper",
    }
}

fn render_row(index: usize, record: &Record) -> String {
    let score = record
        .score
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "-".into());
    let date = record
        .published_or_posted_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    let location = record.location.as_deref().unwrap_or("");
    let remote = if record.remote { " 🌍" } else { "" };
    let tags = record.tags.iter().cloned().collect::<Vec<_>>().join(", ");
    let row_class = if record.removed_at.is_some() {
        " class=\"removed\""
    } else {
        ""
    };

    format!(
        "      <tr{row_class}>\n        <td>{index}</td>\n        <td><span class=\"badge {kind}\">{kind}</span></td>\n        <td><a href=\"{url}\">{title}</a>{remote}</td>\n        <td>{org}</td>\n        <td>{score}</td>\n        <td>{date}</td>\n        <td>{location}</td>\n        <td>{tags}</td>\n      </tr>\n",
        index = index,
        kind = kind_badge(record.kind),
        url = escape(&record.url),
        title = escape(&record.title),
        remote = remote,
        org = escape(&record.organization_or_venue),
        score = score,
        date = date,
        location = escape(location),
        tags = escape(&tags),
        row_class = row_class,
    )
}

/// Render the full dashboard page for a snapshot.
///
/// `records` is passed separately so the caller controls filtering and
/// ordering; the snapshot supplies only the run metadata.
pub fn render_dashboard(snapshot: &Snapshot, records: &[Record]) -> String {
    let mut rows = String::new();
    for (i, record) in records.iter().enumerate() {
        rows.push_str(&render_row(i + 1, record));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Scout dashboard</title>
  <style>
    body {{ font-family: system-ui, sans-serif; margin: 2rem; color: #1a1a2e; }}
    h1 {{ font-size: 1.4rem; }}
    .meta {{ color: #666; margin-bottom: 1rem; }}
    table {{ border-collapse: collapse; width: 100%; }}
    th, td {{ text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #ddd; }}
    tr:hover {{ background: #f5f7ff; }}
    tr.removed {{ opacity: 0.45; }}
    .badge {{ padding: 0.1rem 0.45rem; border-radius: 0.6rem; font-size: 0.78rem; }}
    .badge.job {{ background: #e3f0ff; color: #174a8c; }}
    .badge.paper {{ background: #eaf7e9; color: #2c6e2f; }}
  </style>
</head>
<body>
  <h1>Scout dashboard</h1>
  <p class="meta">Generated {generated} · sources: {sources} · +{added} / ~{updated} / ={unchanged} / -{removed}</p>
  <table>
    <thead>
      <tr><th>#</th><th>Kind</th><th>Title</th><th>Org / venue</th><th>Score</th><th>Date</th><th>Location</th><th>Tags</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"#,
        generated = snapshot.generated_at.format("%Y-%m-%d %H:%M UTC"),
        sources = escape(&snapshot.source_list.join(", ")),
        added = snapshot.counts.added,
        updated = snapshot.counts.updated,
        unchanged = snapshot.counts.unchanged,
        removed = snapshot.counts.removed,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scout_common::snapshot::ChangeCounts;
    use std::collections::BTreeSet;

    fn snapshot() -> Snapshot {
        let now = Utc::now();
        Snapshot {
            generated_at: now,
            source_list: vec!["acme".into()],
            counts: ChangeCounts {
                added: 1,
                ..Default::default()
            },
            records: vec![Record {
                id: "acme-ml-engineer".into(),
                kind: RecordKind::Job,
                title: "ML <Engineer>".into(),
                organization_or_venue: "Acme & Co".into(),
                url: "https://acme.example/jobs/1".into(),
                published_or_posted_date: None,
                location: Some("Remote".into()),
                remote: true,
                tags: BTreeSet::from(["ml".to_string()]),
                score: Some(12.34),
                first_seen_at: now,
                last_seen_at: now,
                removed_at: None,
                source: "acme".into(),
            }],
        }
    }

    #[test]
    fn test_escapes_untrusted_text() {
        let snap = snapshot();
        let page = render_dashboard(&snap, &snap.records);
        assert!(page.contains("ML &lt;Engineer&gt;"));
        assert!(page.contains("Acme &amp; Co"));
        assert!(!page.contains("ML <Engineer>"));
    }

    #[test]
    fn test_score_rendered_one_decimal() {
        let snap = snapshot();
        let page = render_dashboard(&snap, &snap.records);
        assert!(page.contains("12.3"));
    }

    #[test]
    fn test_removed_rows_marked() {
        let mut snap = snapshot();
        snap.records[0].removed_at = Some(Utc::now());
        let page = render_dashboard(&snap, &snap.records);
        assert!(page.contains("class=\"removed\""));
    }
}
