//! Exponential time decay: `timeFactor = e^(-days / decay_days)`.

use footprint_core::config::ScoringConfig;
use footprint_core::constants::{DEFAULT_DECAY_DAYS, DEFAULT_MIN_INTERVAL_SECS, SECONDS_PER_DAY};
use footprint_core::types::Timestamp;

/// Decay factor after `days`. Range: (0.0, 1.0].
pub fn time_factor(days: f64, decay_days: f64) -> f64 {
    (-days.max(0.0) / decay_days).exp()
}

/// Fractional days from `from` to `to`, clamped at zero.
pub fn days_between(from: Timestamp, to: Timestamp) -> f64 {
    (to - from).max(0) as f64 / SECONDS_PER_DAY
}

/// Scoring parameters resolved from config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    pub decay_days: f64,
    pub min_interval_secs: i64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            decay_days: DEFAULT_DECAY_DAYS,
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
        }
    }
}

impl DecayParams {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            decay_days: config.effective_decay_days(),
            min_interval_secs: config.effective_min_interval_secs(),
        }
    }

    /// Decay factor between two instants.
    pub fn factor_between(&self, from: Timestamp, to: Timestamp) -> f64 {
        time_factor(days_between(from, to), self.decay_days)
    }

    /// Score `score` computed at `at`, decayed forward to `now`.
    pub fn decay(&self, score: f64, at: Timestamp, now: Timestamp) -> f64 {
        score * self.factor_between(at, now)
    }

    /// Contribution of one closed interval as seen at `now`.
    ///
    /// An instantaneous access counts as one minute of use. Intervals shorter
    /// than `min_interval_secs` count for nothing, longer ones by minutes.
    pub fn interval_contribution(&self, start: Timestamp, end: Timestamp, now: Timestamp) -> f64 {
        let length = end - start;
        if length == 0 {
            self.factor_between(end, now)
        } else if length >= self.min_interval_secs && length > 0 {
            self.factor_between(end, now) * length as f64 / 60.0
        } else {
            0.0
        }
    }
}
