//! Background score maintainer configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAINTAINER_POLL_MS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MaintainerConfig {
    /// How long the worker waits to coalesce requests before each pass. Default: 5000.
    pub poll_interval_ms: Option<u64>,
}

impl MaintainerConfig {
    pub fn effective_poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_MAINTAINER_POLL_MS))
    }
}
