//! Snapshot writer: one new immutable file per run
//!
//! Files are named by timestamp so the series sorts chronologically, and an
//! existing file is never overwritten. Records are sorted by id before
//! serialization so diffs between snapshots are reproducible regardless of
//! reconciliation order. The write goes through a temp file in the same
//! directory plus a rename, so an aborted run leaves no partial snapshot.
//!
//! Known limitation: two concurrent runs cannot corrupt each other's output
//! files, but they can both read the same "previous" snapshot and race.

use scout_common::time::filename_stamp;
use scout_common::{Error, Result, Snapshot};
use std::path::{Path, PathBuf};

const SNAPSHOT_PREFIX: &str = "snapshot_";

/// Write `snapshot` into `dir` under a fresh timestamped name.
pub fn write_snapshot(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    let mut snapshot = snapshot.clone();
    snapshot.records.sort_by(|a, b| a.id.cmp(&b.id));

    std::fs::create_dir_all(dir).map_err(|e| {
        Error::Persistence(format!("Cannot create snapshot dir {}: {}", dir.display(), e))
    })?;

    let stamp = filename_stamp(snapshot.generated_at);
    let mut path = dir.join(format!("{}{}.json", SNAPSHOT_PREFIX, stamp));
    // Same-second runs get a numeric suffix instead of a clobbered file
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}{}_{}.json", SNAPSHOT_PREFIX, stamp, n));
        n += 1;
    }

    write_to(&path, &snapshot)?;
    tracing::info!(path = %path.display(), records = snapshot.records.len(), "Snapshot written");
    Ok(path)
}

/// Write `snapshot` to an explicit path, refusing to overwrite history.
pub fn write_snapshot_to(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if path.exists() {
        return Err(Error::Persistence(format!(
            "Refusing to overwrite existing snapshot {}",
            path.display()
        )));
    }
    let mut snapshot = snapshot.clone();
    snapshot.records.sort_by(|a, b| a.id.cmp(&b.id));
    write_to(path, &snapshot)
}

fn write_to(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let body = serde_json::to_string_pretty(snapshot)?;

    let tmp = dir.join(format!(
        ".{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".into())
    ));
    std::fs::write(&tmp, body.as_bytes())
        .map_err(|e| Error::Persistence(format!("Cannot write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| Error::Persistence(format!("Cannot finalize {}: {}", path.display(), e)))
}

/// Most recent snapshot file in `dir`, by filename order.
///
/// Returns `None` on the first ever run (no directory or no snapshots yet).
pub fn latest_snapshot(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Persistence(format!(
                "Cannot list snapshot dir {}: {}",
                dir.display(),
                e
            )))
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().map(|ext| ext == "json").unwrap_or(false)
                && path
                    .file_name()
                    .map(|name| name.to_string_lossy().starts_with(SNAPSHOT_PREFIX))
                    .unwrap_or(false)
        })
        .collect();
    candidates.sort();
    Ok(candidates.pop())
}

/// Load the record set of the latest snapshot, or empty on a first run.
pub fn load_previous(dir: &Path) -> Result<Vec<scout_common::Record>> {
    match latest_snapshot(dir)? {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reconciling against previous snapshot");
            Ok(Snapshot::load(&path)?.records)
        }
        None => {
            tracing::info!(dir = %dir.display(), "No previous snapshot; starting fresh");
            Ok(Vec::new())
        }
    }
}
