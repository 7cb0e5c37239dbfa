//! Event payloads emitted by the scoring engine.

use serde::{Deserialize, Serialize};

use crate::types::{ResourceTriple, Timestamp};

/// A score row was recomputed and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdatedEvent {
    pub activity: String,
    pub agent: String,
    pub resource: String,
    pub score: f64,
    pub last_update: Timestamp,
    pub first_update: Timestamp,
}

impl ScoreUpdatedEvent {
    pub fn triple(&self) -> ResourceTriple {
        ResourceTriple::new(&self.activity, &self.agent, &self.resource)
    }
}

/// Stored statistics were purged by a client request or retention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDeletedEvent {
    /// `None` when the purge covered every activity.
    pub activity: Option<String>,
    pub events_deleted: u64,
    pub scores_deleted: u64,
}

/// Non-fatal failure inside a background path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
