//! scout-pipeline library interface
//!
//! The aggregation-and-reconciliation core: source adapters, normalizer,
//! reconciler, scorer, snapshot writer, and the orchestrator that sequences
//! them for one run. Exposed as a library so the stages can be exercised
//! directly in tests.

pub mod client;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod score;
pub mod snapshot;
pub mod sources;

pub use pipeline::{PipelineConfig, RunSummary};
pub use score::ScoreRules;
