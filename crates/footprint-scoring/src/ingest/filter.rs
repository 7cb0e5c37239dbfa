//! EventFilter: privacy and relevance rules applied before anything is stored.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use footprint_core::config::{IngestConfig, WhatToRemember};
use footprint_core::errors::ConfigError;

use super::glob::BlockList;

struct FilterState {
    mode: WhatToRemember,
    applications: HashSet<String>,
    blocked_by_default: bool,
    blocklist: BlockList,
    off_the_record: HashSet<String>,
}

impl FilterState {
    fn from_config(config: &IngestConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            mode: config.effective_what_to_remember(),
            applications: config.applications.iter().cloned().collect(),
            blocked_by_default: config.effective_blocked_by_default(),
            blocklist: BlockList::compile(&config.effective_blocked_patterns())?,
            off_the_record: config.off_the_record_activities.iter().cloned().collect(),
        })
    }
}

/// Shared filter state. Reads vastly outnumber writes, hence the `RwLock`.
pub struct EventFilter {
    state: RwLock<FilterState>,
}

impl EventFilter {
    pub fn from_config(config: &IngestConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            state: RwLock::new(FilterState::from_config(config)?),
        })
    }

    /// Replace all rules. On error the previous rules stay in effect.
    pub fn reload(&self, config: &IngestConfig) -> Result<(), ConfigError> {
        let fresh = FilterState::from_config(config)?;
        *self.write() = fresh;
        tracing::info!("event filter reloaded");
        Ok(())
    }

    pub fn is_off_the_record(&self, activity: &str) -> bool {
        self.read().off_the_record.contains(activity)
    }

    pub fn set_off_the_record(&self, activity: &str, off_the_record: bool) {
        let mut state = self.write();
        if off_the_record {
            state.off_the_record.insert(activity.to_string());
        } else {
            state.off_the_record.remove(activity);
        }
    }

    /// Whether events from `application` are recorded at all.
    pub fn accepts_application(&self, application: &str) -> bool {
        let state = self.read();
        match state.mode {
            WhatToRemember::AllApplications => true,
            WhatToRemember::NoApplications => false,
            WhatToRemember::SpecificApplications => {
                let listed = state.applications.contains(application);
                if state.blocked_by_default {
                    listed
                } else {
                    !listed
                }
            }
        }
    }

    pub fn is_blocked(&self, uri: &str) -> bool {
        self.read().blocklist.is_blocked(uri)
    }

    fn read(&self) -> RwLockReadGuard<'_, FilterState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FilterState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specific(apps: &[&str], blocked_by_default: bool) -> EventFilter {
        EventFilter::from_config(&IngestConfig {
            what_to_remember: Some(WhatToRemember::SpecificApplications),
            applications: apps.iter().map(|a| a.to_string()).collect(),
            blocked_by_default: Some(blocked_by_default),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn allow_list_mode() {
        let filter = specific(&["okular"], true);
        assert!(filter.accepts_application("okular"));
        assert!(!filter.accepts_application("kate"));
    }

    #[test]
    fn block_list_mode() {
        let filter = specific(&["okular"], false);
        assert!(!filter.accepts_application("okular"));
        assert!(filter.accepts_application("kate"));
    }

    #[test]
    fn no_applications_mode() {
        let filter = EventFilter::from_config(&IngestConfig {
            what_to_remember: Some(WhatToRemember::NoApplications),
            ..Default::default()
        })
        .unwrap();
        assert!(!filter.accepts_application("kate"));
    }

    #[test]
    fn off_the_record_toggle() {
        let filter = EventFilter::from_config(&IngestConfig {
            off_the_record_activities: vec!["private".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(filter.is_off_the_record("private"));
        filter.set_off_the_record("private", false);
        filter.set_off_the_record("work", true);
        assert!(!filter.is_off_the_record("private"));
        assert!(filter.is_off_the_record("work"));
    }

    #[test]
    fn failed_reload_keeps_old_rules() {
        let filter = EventFilter::from_config(&IngestConfig::default()).unwrap();
        let bad = IngestConfig {
            blocked_patterns: Some(vec![String::new()]),
            ..Default::default()
        };
        assert!(filter.reload(&bad).is_err());
        assert!(filter.is_blocked("about:blank"));

        let none = IngestConfig {
            blocked_patterns: Some(Vec::new()),
            ..Default::default()
        };
        filter.reload(&none).unwrap();
        assert!(!filter.is_blocked("about:blank"));
    }
}
