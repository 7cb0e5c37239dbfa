//! Client subscriptions to ranking updates.

use footprint_core::types::Filter;

/// Subscriptions are unique per (client, request id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionKey {
    pub client: String,
    pub request_id: String,
}

impl SubscriptionKey {
    pub fn new(client: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            request_id: request_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSubscription {
    pub key: SubscriptionKey,
    pub activity: Filter,
    pub agent: Filter,
}

impl ClientSubscription {
    /// Whether a score change of (`activity`, `agent`) concerns this subscription.
    ///
    /// `current` is the current activity. `:current` only has a meaning for
    /// the activity filter; as an agent filter it matches nothing.
    pub fn matches(&self, activity: &str, agent: &str, current: &str) -> bool {
        self.activity.matches(activity, Some(current)) && self.agent.matches(agent, None)
    }

    pub fn follows_current_activity(&self) -> bool {
        self.activity == Filter::Current
    }
}
