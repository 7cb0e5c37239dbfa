//! History retention configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RetentionConfig {
    /// Purge history older than this many months at startup. 0 keeps everything. Default: 0.
    pub keep_history_months: Option<u32>,
}

impl RetentionConfig {
    pub fn effective_keep_history_months(&self) -> u32 {
        self.keep_history_months.unwrap_or(0)
    }
}
