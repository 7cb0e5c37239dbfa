//! Score decay configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DECAY_DAYS, DEFAULT_MIN_INTERVAL_SECS};

/// Configuration for score computation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Time constant of the exponential decay, in days. Default: 32.
    pub decay_days: Option<f64>,
    /// Non-zero intervals shorter than this many seconds are ignored. Default: 4.
    pub min_interval_secs: Option<i64>,
}

impl ScoringConfig {
    pub fn effective_decay_days(&self) -> f64 {
        self.decay_days.unwrap_or(DEFAULT_DECAY_DAYS)
    }

    pub fn effective_min_interval_secs(&self) -> i64 {
        self.min_interval_secs.unwrap_or(DEFAULT_MIN_INTERVAL_SECS)
    }
}
