//! # Scout Common Library
//!
//! Shared code for the scout pipeline and its downstream tools including:
//! - Canonical record model (jobs and papers)
//! - Snapshot format and loading
//! - Stable identity derivation
//! - Error taxonomy
//! - SMTP configuration
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod identity;
pub mod record;
pub mod snapshot;
pub mod time;

pub use error::{Error, Result};
pub use record::{Record, RecordKind};
pub use snapshot::{ChangeCounts, Snapshot};
