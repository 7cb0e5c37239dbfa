//! NotificationSink trait: outbound channel for ranking updates.

use std::sync::Mutex;

use crate::types::RankingNotification;

/// Delivers ranking notifications to a client.
///
/// Implementations own the transport. A push to a client that has gone away
/// must be harmless.
pub trait NotificationSink: Send + Sync {
    fn push(&self, client: &str, notification: &RankingNotification);
}

/// Sink that records every push in order. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pushed: Mutex<Vec<(String, RankingNotification)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything pushed so far.
    pub fn notifications(&self) -> Vec<(String, RankingNotification)> {
        self.pushed.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Notifications pushed to one client, in order.
    pub fn for_client(&self, client: &str) -> Vec<RankingNotification> {
        self.notifications()
            .into_iter()
            .filter(|(c, _)| c == client)
            .map(|(_, n)| n)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut p) = self.pushed.lock() {
            p.clear();
        }
    }
}

impl NotificationSink for CollectingSink {
    fn push(&self, client: &str, notification: &RankingNotification) {
        if let Ok(mut p) = self.pushed.lock() {
            p.push((client.to_string(), notification.clone()));
        }
    }
}
