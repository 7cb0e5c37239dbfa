//! EventStore: interval persistence for the ingest path.
//!
//! Storage failures never propagate from here: they are logged at `warn`
//! and the call degrades to a no-op (or an empty result).

use std::sync::Arc;

use footprint_core::types::{ResourceTriple, Timestamp};

use crate::connection::DatabaseManager;
use crate::queries::resource_events;
use crate::retention::{self, PurgeScope, RetentionReport};

pub use crate::queries::resource_events::Interval;

#[derive(Clone)]
pub struct EventStore {
    db: Arc<DatabaseManager>,
}

impl EventStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Record an interval. `end == Some(start)` is an instantaneous access,
    /// `end == None` leaves the interval open.
    pub fn open_interval(&self, triple: &ResourceTriple, start: Timestamp, end: Option<Timestamp>) {
        let result = self
            .db
            .with_writer(|conn| resource_events::insert_event(conn, triple, start, end));
        if let Err(e) = result {
            tracing::warn!(%triple, error = %e, "failed to record interval");
        }
    }

    /// Close the most recent open interval of `triple`.
    /// Returns `true` if an interval was closed.
    pub fn close_interval(&self, triple: &ResourceTriple, end: Timestamp) -> bool {
        match self
            .db
            .with_writer(|conn| resource_events::close_latest_open(conn, triple, end))
        {
            Ok(true) => true,
            Ok(false) => {
                tracing::debug!(%triple, "close without an open interval");
                false
            }
            Err(e) => {
                tracing::warn!(%triple, error = %e, "failed to close interval");
                false
            }
        }
    }

    pub fn has_open_interval(&self, triple: &ResourceTriple) -> bool {
        self.db
            .with_reader(|conn| resource_events::has_open(conn, triple))
            .unwrap_or_else(|e| {
                tracing::warn!(%triple, error = %e, "failed to look up open interval");
                false
            })
    }

    /// Intervals that started after `since`, oldest first.
    pub fn query_intervals_since(&self, triple: &ResourceTriple, since: Timestamp) -> Vec<Interval> {
        self.db
            .with_reader(|conn| resource_events::intervals_since(conn, triple, since))
            .unwrap_or_else(|e| {
                tracing::warn!(%triple, error = %e, "failed to query intervals");
                Vec::new()
            })
    }

    /// Drop closed events that ended before `cutoff` and score rows last
    /// updated before it. `None` covers every activity.
    pub fn purge_before(&self, activity: Option<&str>, cutoff: Timestamp) -> RetentionReport {
        let scope = PurgeScope {
            activity: activity.map(str::to_string),
            agent: None,
        };
        self.db
            .with_writer(|conn| retention::purge_earlier(conn, &scope, cutoff))
            .unwrap_or_else(|e| {
                tracing::warn!(?activity, cutoff, error = %e, "failed to purge history");
                RetentionReport::default()
            })
    }
}
