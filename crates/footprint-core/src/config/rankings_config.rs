//! Ranking subscription configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RESULT_LIMIT;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RankingsConfig {
    /// Maximum entries in a full-replace snapshot. Default: 30.
    pub result_limit: Option<usize>,
}

impl RankingsConfig {
    pub fn effective_result_limit(&self) -> usize {
        self.result_limit.unwrap_or(DEFAULT_RESULT_LIMIT)
    }
}
