//! Ranking notifications pushed to subscribed clients.

use serde::{Deserialize, Serialize};

/// A resource and its cached score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResource {
    pub resource: String,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    /// The client drops its local view and takes `data` as-is.
    Replace,
    /// The client merges `data` into its local sorted view.
    Incremental,
}

/// Logical `Updated(requestId, mode, data)` push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingNotification {
    pub request_id: String,
    pub mode: UpdateMode,
    pub data: Vec<RankedResource>,
}

impl RankingNotification {
    /// Encode for transports that carry JSON payloads.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
