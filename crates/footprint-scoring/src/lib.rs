//! # footprint-scoring
//!
//! Usage scoring on top of `footprint-storage`: exponential decay math, the
//! score cache, the coalescing background maintainer, ranking subscriptions,
//! event ingestion with filtering, resource linking, and the engine that
//! wires them together.

pub mod decay;
pub mod engine;
pub mod ingest;
pub mod linking;
pub mod maintainer;
pub mod rankings;
pub mod score_cache;

pub use decay::DecayParams;
pub use engine::FootprintEngine;
pub use ingest::{DropReason, EventFilter, EventIngest, IngestOutcome};
pub use linking::ResourceLinking;
pub use maintainer::ScoreMaintainer;
pub use rankings::RankingIndex;
pub use score_cache::ScoreCache;

use footprint_core::types::Timestamp;

/// Wall clock in Unix seconds.
pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp()
}
