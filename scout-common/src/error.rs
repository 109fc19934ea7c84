//! Common error types for the scout pipeline

use thiserror::Error;

/// Common result type for scout operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the pipeline and the downstream tools.
///
/// Source- and record-level errors are absorbed into the run summary by the
/// orchestrator; persistence and configuration errors abort the run.
#[derive(Error, Debug)]
pub enum Error {
    /// A source could not be reached at all, after the retry budget
    #[error("Source '{source}' unavailable: {reason}")]
    SourceUnavailable {
        // Raw identifier keeps thiserror from treating this field (a source
        // *name*, not an error) as the std::error::Error::source() value.
        r#source: String,
        reason: String,
    },

    /// A single raw item failed to parse or was missing required fields.
    /// Never fatal; recorded in the run's skip list.
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// Snapshot destination unwritable, disk full, or an existing file
    /// would be clobbered. Fatal; the run aborts without a partial write.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Missing or invalid configuration (for example SMTP credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every configured source failed; no snapshot was produced
    #[error("No source succeeded: {0}")]
    AllSourcesFailed(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
