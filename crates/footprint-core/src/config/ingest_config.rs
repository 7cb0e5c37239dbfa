//! Event acceptance configuration: application mode, blocklist, off-the-record activities.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BLOCKED_PATTERNS;

/// Which applications' events are recorded at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WhatToRemember {
    #[default]
    AllApplications,
    SpecificApplications,
    NoApplications,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    /// Application recording mode. Default: all applications.
    pub what_to_remember: Option<WhatToRemember>,
    /// Applications consulted in `specific_applications` mode.
    #[serde(default)]
    pub applications: Vec<String>,
    /// When true, `applications` is an allow list; otherwise it is a block list.
    pub blocked_by_default: Option<bool>,
    /// Glob patterns of resources never recorded. `None` uses the built-in list.
    pub blocked_patterns: Option<Vec<String>>,
    /// Activities whose events are never recorded.
    #[serde(default)]
    pub off_the_record_activities: Vec<String>,
}

impl IngestConfig {
    pub fn effective_what_to_remember(&self) -> WhatToRemember {
        self.what_to_remember.unwrap_or_default()
    }

    pub fn effective_blocked_by_default(&self) -> bool {
        self.blocked_by_default.unwrap_or(false)
    }

    pub fn effective_blocked_patterns(&self) -> Vec<String> {
        match &self.blocked_patterns {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_BLOCKED_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
