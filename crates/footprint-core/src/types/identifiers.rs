//! Identifiers for activities, agents, and resources, plus subscription filters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{TOKEN_ANY, TOKEN_CURRENT, TOKEN_GLOBAL};

/// Unix timestamp in seconds.
pub type Timestamp = i64;

pub type ActivityId = String;
pub type AgentId = String;
pub type ResourceUri = String;

/// The natural key shared by `ResourceEvent`, `ResourceScoreCache`, and `ResourceLink`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceTriple {
    pub activity: ActivityId,
    pub agent: AgentId,
    pub resource: ResourceUri,
}

impl ResourceTriple {
    pub fn new(
        activity: impl Into<ActivityId>,
        agent: impl Into<AgentId>,
        resource: impl Into<ResourceUri>,
    ) -> Self {
        Self {
            activity: activity.into(),
            agent: agent.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for ResourceTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.activity, self.agent, self.resource)
    }
}

/// Activity or agent filter of a ranking subscription or purge request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    /// `:any`: every value.
    Any,
    /// Empty string or `:global`: the unscoped bucket. Matches every value.
    Global,
    /// `:current`: whatever activity is current when the filter is evaluated.
    Current,
    /// One specific activity or agent.
    Value(String),
}

impl Filter {
    /// Parse the wire representation of a filter.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | TOKEN_GLOBAL => Self::Global,
            TOKEN_ANY => Self::Any,
            TOKEN_CURRENT => Self::Current,
            other => Self::Value(other.to_string()),
        }
    }

    /// Check `value` against the filter. `current` is consulted only for `Current`.
    pub fn matches(&self, value: &str, current: Option<&str>) -> bool {
        match self {
            Self::Any | Self::Global => true,
            Self::Current => current == Some(value),
            Self::Value(v) => v == value,
        }
    }

    /// Resolve the filter to a concrete column value, `None` meaning "no constraint".
    pub fn resolve<'a>(&'a self, current: Option<&'a str>) -> Option<&'a str> {
        match self {
            Self::Any | Self::Global => None,
            Self::Current => Some(current.unwrap_or_default()),
            Self::Value(v) => Some(v.as_str()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(TOKEN_ANY),
            Self::Global => f.write_str(TOKEN_GLOBAL),
            Self::Current => f.write_str(TOKEN_CURRENT),
            Self::Value(v) => f.write_str(v),
        }
    }
}
