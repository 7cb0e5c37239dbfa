//! RankingIndex: live top-N views pushed to subscribed clients.
//!
//! Registering pushes a full **replace** snapshot; every later score change
//! is pushed as an **incremental** single-entry update to each matching
//! subscription. A push mutex orders the two so a subscription never sees an
//! incremental before its first replace.

pub mod subscription;

use std::sync::{Arc, Mutex, MutexGuard};

use dashmap::DashMap;
use footprint_core::events::{ScoreEventHandler, ScoreUpdatedEvent};
use footprint_core::traits::{ActivityProvider, NotificationSink};
use footprint_core::types::{Filter, RankedResource, RankingNotification, UpdateMode};
use footprint_storage::queries::score_cache;
use footprint_storage::DatabaseManager;

pub use self::subscription::{ClientSubscription, SubscriptionKey};

pub struct RankingIndex {
    db: Arc<DatabaseManager>,
    activities: Arc<dyn ActivityProvider>,
    sink: Arc<dyn NotificationSink>,
    subscriptions: DashMap<SubscriptionKey, ClientSubscription>,
    push_lock: Mutex<()>,
    result_limit: usize,
}

impl RankingIndex {
    pub fn new(
        db: Arc<DatabaseManager>,
        activities: Arc<dyn ActivityProvider>,
        sink: Arc<dyn NotificationSink>,
        result_limit: usize,
    ) -> Self {
        Self {
            db,
            activities,
            sink,
            subscriptions: DashMap::new(),
            push_lock: Mutex::new(()),
            result_limit,
        }
    }

    /// Insert or replace a subscription and push its initial snapshot.
    pub fn register_client(
        &self,
        client: &str,
        request_id: &str,
        activity: Filter,
        agent: Filter,
    ) {
        let subscription = ClientSubscription {
            key: SubscriptionKey::new(client, request_id),
            activity,
            agent,
        };
        let _push = self.lock_push();
        self.subscriptions
            .insert(subscription.key.clone(), subscription.clone());
        tracing::debug!(client, request_id, "ranking subscription registered");
        self.push_replace(&subscription);
    }

    /// Remove one subscription. No notification is sent.
    pub fn deregister_client(&self, client: &str, request_id: &str) -> bool {
        self.subscriptions
            .remove(&SubscriptionKey::new(client, request_id))
            .is_some()
    }

    /// Remove every subscription of a disconnected client.
    pub fn deregister_all(&self, client: &str) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|key, _| key.client != client);
        before.saturating_sub(self.subscriptions.len())
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Push the new score of `resource` to every subscription watching this
    /// triple. The pushed value is the one the subscription's snapshot would
    /// show: the best score across the triples its filters cover.
    pub fn resource_score_updated(&self, activity: &str, agent: &str, resource: &str, score: f64) {
        let _push = self.lock_push();
        let current = self.activities.current_activity();
        let targets: Vec<ClientSubscription> = self
            .subscriptions
            .iter()
            .filter(|entry| entry.value().matches(activity, agent, &current))
            .map(|entry| entry.value().clone())
            .collect();

        for subscription in targets {
            let score = self
                .best_score(&subscription, &current, resource)
                .unwrap_or(score);
            self.sink.push(
                &subscription.key.client,
                &RankingNotification {
                    request_id: subscription.key.request_id.clone(),
                    mode: UpdateMode::Incremental,
                    data: vec![RankedResource {
                        resource: resource.to_string(),
                        score,
                    }],
                },
            );
        }
    }

    /// Re-send snapshots to subscriptions that follow the current activity.
    pub fn current_activity_changed(&self) {
        self.refresh_where(ClientSubscription::follows_current_activity);
    }

    /// Re-send snapshots to every subscription.
    pub fn refresh_all(&self) {
        self.refresh_where(|_| true);
    }

    /// Top resources for a filter pair. Degrades to empty on storage errors.
    /// `:current` has no meaning as an agent filter and selects nothing.
    pub fn top_resources(&self, activity: &Filter, agent: &Filter, limit: usize) -> Vec<RankedResource> {
        if *agent == Filter::Current {
            return Vec::new();
        }
        let current = self.activities.current_activity();
        let activity = activity.resolve(Some(current.as_str()));
        let agent = agent.resolve(None);
        self.db
            .with_reader(|conn| score_cache::top_resources(conn, activity, agent, limit))
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ranking query failed");
                Vec::new()
            })
    }

    fn best_score(&self, subscription: &ClientSubscription, current: &str, resource: &str) -> Option<f64> {
        let activity = subscription.activity.resolve(Some(current));
        let agent = subscription.agent.resolve(None);
        self.db
            .with_reader(|conn| score_cache::best_score(conn, activity, agent, resource))
            .unwrap_or_else(|e| {
                tracing::warn!(resource, error = %e, "ranking score lookup failed");
                None
            })
    }

    fn refresh_where<F>(&self, predicate: F)
    where
        F: Fn(&ClientSubscription) -> bool,
    {
        let _push = self.lock_push();
        let targets: Vec<ClientSubscription> = self
            .subscriptions
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        for subscription in &targets {
            self.push_replace(subscription);
        }
    }

    /// Caller holds the push lock.
    fn push_replace(&self, subscription: &ClientSubscription) {
        let data = self.top_resources(&subscription.activity, &subscription.agent, self.result_limit);
        self.sink.push(
            &subscription.key.client,
            &RankingNotification {
                request_id: subscription.key.request_id.clone(),
                mode: UpdateMode::Replace,
                data,
            },
        );
    }

    fn lock_push(&self) -> MutexGuard<'_, ()> {
        self.push_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ScoreEventHandler for RankingIndex {
    fn on_score_updated(&self, event: &ScoreUpdatedEvent) {
        self.resource_score_updated(&event.activity, &event.agent, &event.resource, event.score);
    }
}
