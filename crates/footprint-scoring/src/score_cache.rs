//! ScoreCache: incremental, decayed score per (activity, agent, resource).
//!
//! The stored score is decayed forward to "now", then every interval that
//! started after the previous update is added. The read-modify-write runs in
//! one IMMEDIATE transaction so concurrent recomputations cannot lose updates.

use std::sync::Arc;

use footprint_core::constants::NEVER_UPDATED;
use footprint_core::errors::{FootprintErrorCode, StorageError};
use footprint_core::events::{ErrorEvent, EventDispatcher, ScoreUpdatedEvent};
use footprint_core::types::{ResourceTriple, Timestamp};
use footprint_storage::queries::score_cache::{self as score_rows, ScoreRow};
use footprint_storage::queries::resource_events;
use footprint_storage::DatabaseManager;
use rusqlite::Transaction;

use crate::decay::DecayParams;

pub struct ScoreCache {
    db: Arc<DatabaseManager>,
    params: DecayParams,
    events: Arc<EventDispatcher>,
}

impl ScoreCache {
    pub fn new(db: Arc<DatabaseManager>, params: DecayParams, events: Arc<EventDispatcher>) -> Self {
        Self { db, params, events }
    }

    pub fn params(&self) -> DecayParams {
        self.params
    }

    /// Recompute the score of `triple` as of the wall clock.
    pub fn update_score(&self, triple: &ResourceTriple) -> Option<ScoreUpdatedEvent> {
        self.update_score_at(triple, crate::now())
    }

    /// Recompute the score of `triple` as of `now`, persist it, and notify
    /// handlers. Returns `None` if the computation failed.
    pub fn update_score_at(&self, triple: &ResourceTriple, now: Timestamp) -> Option<ScoreUpdatedEvent> {
        let params = self.params;
        match self
            .db
            .with_immediate(|tx| recompute(tx, triple, now, &params))
        {
            Ok(event) => {
                tracing::debug!(%triple, score = event.score, "score updated");
                self.events.emit_score_updated(&event);
                Some(event)
            }
            Err(e) => {
                tracing::warn!(%triple, error = %e, "score update failed");
                self.events.emit_error(&ErrorEvent {
                    message: e.to_string(),
                    error_code: e.error_code().to_string(),
                });
                None
            }
        }
    }

    /// Stored row of `triple`, if any.
    pub fn score_of(&self, triple: &ResourceTriple) -> Option<ScoreRow> {
        self.db
            .with_reader(|conn| score_rows::get_score(conn, triple))
            .unwrap_or_else(|e| {
                tracing::warn!(%triple, error = %e, "score lookup failed");
                None
            })
    }
}

fn recompute(
    tx: &Transaction<'_>,
    triple: &ResourceTriple,
    now: Timestamp,
    params: &DecayParams,
) -> Result<ScoreUpdatedEvent, StorageError> {
    score_rows::ensure_row(tx, triple, now)?;
    let row = score_rows::get_score(tx, triple)?.ok_or_else(|| StorageError::SqliteError {
        message: format!("score row for {triple} vanished inside its transaction"),
    })?;

    let (mut score, since) = if row.last_update == NEVER_UPDATED {
        (0.0, i64::MIN)
    } else {
        (
            params.decay(row.cached_score, row.last_update, now),
            row.last_update,
        )
    };

    let mut last_processed = None;
    for interval in resource_events::intervals_since(tx, triple, since)? {
        // Open intervals are scored once they close.
        let Some(end) = interval.end else { continue };
        if end < interval.start {
            continue;
        }
        score += params.interval_contribution(interval.start, end, now);
        last_processed = Some(interval.start);
    }
    let last_update = last_processed.unwrap_or(now);

    score_rows::update_score(tx, triple, score, last_update)?;

    Ok(ScoreUpdatedEvent {
        activity: triple.activity.clone(),
        agent: triple.agent.clone(),
        resource: triple.resource.clone(),
        score,
        last_update,
        first_update: row.first_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_storage::EventStore;

    const DAY: i64 = 86_400;

    fn cache() -> (EventStore, ScoreCache) {
        let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
        let cache = ScoreCache::new(
            db.clone(),
            DecayParams::default(),
            Arc::new(EventDispatcher::new()),
        );
        (EventStore::new(db), cache)
    }

    fn doc() -> ResourceTriple {
        ResourceTriple::new("A1", "kate", "/home/u/notes.txt")
    }

    #[test]
    fn first_update_starts_from_zero() {
        let (_store, cache) = cache();
        let event = cache.update_score_at(&doc(), 1_000).unwrap();
        assert_eq!(event.score, 0.0);
        assert_eq!(event.last_update, 1_000);
        assert_eq!(event.first_update, 1_000);
    }

    #[test]
    fn open_intervals_do_not_count() {
        let (store, cache) = cache();
        store.open_interval(&doc(), 1_000, None);
        let event = cache.update_score_at(&doc(), 2_000).unwrap();
        assert_eq!(event.score, 0.0);
    }

    #[test]
    fn stored_score_decays_between_updates() {
        let (store, cache) = cache();
        store.open_interval(&doc(), 1_000, Some(1_000));
        let first = cache.update_score_at(&doc(), 1_000).unwrap();
        assert!((first.score - 1.0).abs() < 1e-9);

        let later = cache.update_score_at(&doc(), 1_000 + 32 * DAY).unwrap();
        assert!((later.score - (-1.0f64).exp()).abs() < 1e-9);
        // Nothing new was processed, so lastUpdate moves to now.
        assert_eq!(later.last_update, 1_000 + 32 * DAY);
    }
}
