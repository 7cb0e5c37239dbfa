//! FootprintEngine: owns the database and every scoring component.
//!
//! Construction is explicit: one `DatabaseManager`, one dispatcher with the
//! ranking index registered on it, and one instance of each component wired
//! through `Arc`s. There is no global state.

use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use footprint_core::config::FootprintConfig;
use footprint_core::constants::{TOKEN_ANY, TOKEN_CURRENT, TOKEN_GLOBAL};
use footprint_core::errors::{EngineError, RequestError, StorageError};
use footprint_core::events::{EventDispatcher, ScoreEventHandler, StatsDeletedEvent};
use footprint_core::traits::{ActivityProvider, NotificationSink};
use footprint_core::types::{Filter, RankedResource, RawEvent, Timestamp};
use footprint_storage::retention::{self, EVENTS_TABLE, SCORES_TABLE};
use footprint_storage::{DatabaseManager, EventStore, PurgeScope, RetentionReport};

use crate::decay::DecayParams;
use crate::ingest::glob::glob_to_like;
use crate::ingest::{EventFilter, EventIngest, IngestOutcome};
use crate::linking::ResourceLinking;
use crate::maintainer::ScoreMaintainer;
use crate::rankings::RankingIndex;
use crate::score_cache::ScoreCache;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

pub struct FootprintEngine {
    config: FootprintConfig,
    db: Arc<DatabaseManager>,
    activities: Arc<dyn ActivityProvider>,
    dispatcher: Arc<EventDispatcher>,
    cache: Arc<ScoreCache>,
    maintainer: Arc<ScoreMaintainer>,
    rankings: Arc<RankingIndex>,
    filter: Arc<EventFilter>,
    ingest: EventIngest,
    linking: ResourceLinking,
}

impl FootprintEngine {
    pub fn open(
        config: FootprintConfig,
        activities: Arc<dyn ActivityProvider>,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<Self, EngineError> {
        Self::open_with_handlers(config, activities, sink, Vec::new())
    }

    /// Like [`open`](Self::open), with extra handlers registered after the
    /// ranking index.
    pub fn open_with_handlers(
        config: FootprintConfig,
        activities: Arc<dyn ActivityProvider>,
        sink: Arc<dyn NotificationSink>,
        handlers: Vec<Arc<dyn ScoreEventHandler>>,
    ) -> Result<Self, EngineError> {
        FootprintConfig::validate(&config)?;

        let db = Arc::new(match &config.storage.database_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StorageError::sqlite(format!(
                            "failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                DatabaseManager::open(path, config.storage.effective_read_pool_size())?
            }
            None => DatabaseManager::open_in_memory()?,
        });

        let keep_months = config.retention.effective_keep_history_months();
        if keep_months > 0 {
            let cutoff = months_before(crate::now(), keep_months);
            db.with_writer(|conn| retention::apply_retention(conn, cutoff))?;
        }

        let rankings = Arc::new(RankingIndex::new(
            Arc::clone(&db),
            Arc::clone(&activities),
            sink,
            config.rankings.effective_result_limit(),
        ));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Arc::clone(&rankings) as Arc<dyn ScoreEventHandler>);
        for handler in handlers {
            dispatcher.register(handler);
        }
        let dispatcher = Arc::new(dispatcher);

        let cache = Arc::new(ScoreCache::new(
            Arc::clone(&db),
            DecayParams::from_config(&config.scoring),
            Arc::clone(&dispatcher),
        ));
        let maintainer = Arc::new(ScoreMaintainer::new(
            Arc::clone(&cache),
            Arc::clone(&activities),
            config.maintainer.effective_poll_interval(),
        ));
        let filter = Arc::new(EventFilter::from_config(&config.ingest)?);
        let ingest = EventIngest::new(
            EventStore::new(Arc::clone(&db)),
            Arc::clone(&filter),
            Arc::clone(&maintainer),
            Arc::clone(&activities),
        );
        let linking = ResourceLinking::new(Arc::clone(&db), Arc::clone(&activities));

        tracing::info!(
            database = ?config.storage.database_path,
            handlers = dispatcher.handler_count(),
            "footprint engine opened"
        );

        Ok(Self {
            config,
            db,
            activities,
            dispatcher,
            cache,
            maintainer,
            rankings,
            filter,
            ingest,
            linking,
        })
    }

    pub fn config(&self) -> &FootprintConfig {
        &self.config
    }

    pub fn database(&self) -> &Arc<DatabaseManager> {
        &self.db
    }

    pub fn rankings(&self) -> &Arc<RankingIndex> {
        &self.rankings
    }

    pub fn filter(&self) -> &Arc<EventFilter> {
        &self.filter
    }

    pub fn linking(&self) -> &ResourceLinking {
        &self.linking
    }

    pub fn score_cache(&self) -> &Arc<ScoreCache> {
        &self.cache
    }

    pub fn maintainer(&self) -> &Arc<ScoreMaintainer> {
        &self.maintainer
    }

    // ─── Clients ─────────────────────────────────────────────────────────

    /// Subscribe `client` to rankings. Filters use the wire tokens
    /// (`:any`, `:global`, `:current`, or a literal value). `:current` is
    /// only accepted for the activity.
    pub fn register_client(
        &self,
        client: &str,
        request_id: &str,
        activity: &str,
        agent: &str,
    ) -> Result<(), RequestError> {
        let agent = Filter::parse(agent);
        if agent == Filter::Current {
            return Err(RequestError::InvalidArgument {
                name: "agent".to_string(),
                message: format!("{TOKEN_CURRENT} is only valid for activities"),
            });
        }
        self.rankings
            .register_client(client, request_id, Filter::parse(activity), agent);
        Ok(())
    }

    pub fn deregister_client(&self, client: &str, request_id: &str) -> bool {
        self.rankings.deregister_client(client, request_id)
    }

    pub fn deregister_all(&self, client: &str) -> usize {
        self.rankings.deregister_all(client)
    }

    pub fn top_resources(&self, activity: &str, agent: &str, limit: usize) -> Vec<RankedResource> {
        self.rankings
            .top_resources(&Filter::parse(activity), &Filter::parse(agent), limit)
    }

    /// Forward an activity switch to subscriptions following `:current`.
    pub fn current_activity_changed(&self) {
        self.rankings.current_activity_changed();
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn add_event(&self, event: RawEvent) -> IngestOutcome {
        self.ingest.add_event(event)
    }

    pub fn add_events<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = RawEvent>,
    {
        self.ingest.add_events(events)
    }

    /// A window went away: close every resource it still had open.
    pub fn window_closed(&self, window_id: u64) -> usize {
        self.ingest.window_closed(window_id)
    }

    pub fn ingest(&self) -> &EventIngest {
        &self.ingest
    }

    // ─── Purges ──────────────────────────────────────────────────────────

    /// Forget usage newer than `count` units ago. `unit` is `h`, `d`, `m`, or
    /// `everything` (count ignored).
    pub fn delete_recent_stats(
        &self,
        activity: &str,
        count: u32,
        unit: &str,
    ) -> Result<RetentionReport, RequestError> {
        let scope = PurgeScope {
            activity: self.purge_activity(activity)?,
            agent: None,
        };
        let cutoff = recent_cutoff(crate::now(), count, unit)?;
        self.run_purge(&scope, |conn| retention::purge_recent(conn, &scope, cutoff))
    }

    /// Forget usage older than `months` months.
    pub fn delete_earlier_stats(
        &self,
        activity: &str,
        months: u32,
    ) -> Result<RetentionReport, RequestError> {
        let scope = PurgeScope {
            activity: self.purge_activity(activity)?,
            agent: None,
        };
        let cutoff = months_before(crate::now(), months);
        self.run_purge(&scope, |conn| retention::purge_earlier(conn, &scope, cutoff))
    }

    /// Forget every resource matching the glob `pattern`. `activity` and
    /// `agent` accept `:any`; `activity` also accepts `:current`.
    pub fn delete_stats_for_resource(
        &self,
        activity: &str,
        agent: &str,
        pattern: &str,
    ) -> Result<RetentionReport, RequestError> {
        if pattern.is_empty() {
            return Err(RequestError::InvalidArgument {
                name: "pattern".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let agent = match agent {
            "" | TOKEN_ANY => None,
            TOKEN_GLOBAL => Some(String::new()),
            TOKEN_CURRENT => {
                return Err(RequestError::InvalidArgument {
                    name: "agent".to_string(),
                    message: format!("{TOKEN_CURRENT} is only valid for activities"),
                })
            }
            other => Some(other.to_string()),
        };
        let scope = PurgeScope {
            activity: self.purge_activity(activity)?,
            agent,
        };
        let like = glob_to_like(pattern);
        self.run_purge(&scope, |conn| retention::purge_resource(conn, &scope, &like))
    }

    /// Resolve the activity of a purge request. `None` covers every activity.
    fn purge_activity(&self, activity: &str) -> Result<Option<String>, RequestError> {
        match activity {
            "" | TOKEN_ANY => Ok(None),
            TOKEN_GLOBAL => Ok(Some(String::new())),
            TOKEN_CURRENT => {
                let current = self.activities.current_activity();
                if current.is_empty() {
                    Err(RequestError::UnknownActivity {
                        activity: TOKEN_CURRENT.to_string(),
                    })
                } else {
                    Ok(Some(current))
                }
            }
            known if self.activities.is_known(known) => Ok(Some(known.to_string())),
            unknown => Err(RequestError::UnknownActivity {
                activity: unknown.to_string(),
            }),
        }
    }

    fn run_purge<F>(&self, scope: &PurgeScope, purge: F) -> Result<RetentionReport, RequestError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<RetentionReport, StorageError>,
    {
        let report = self.db.with_writer(purge)?;
        tracing::info!(
            activity = ?scope.activity,
            agent = ?scope.agent,
            total_deleted = report.total_deleted,
            "stats deleted"
        );
        self.dispatcher.emit_stats_deleted(&StatsDeletedEvent {
            activity: scope.activity.clone(),
            events_deleted: report.deleted_from(EVENTS_TABLE),
            scores_deleted: report.deleted_from(SCORES_TABLE),
        });
        self.rankings.refresh_all();
        Ok(report)
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Rescore everything still pending on the calling thread.
    pub fn flush(&self) -> usize {
        self.maintainer.flush()
    }

    /// Stop the maintainer, drain its queue, and checkpoint the WAL.
    pub fn shutdown(&self) {
        self.maintainer.shutdown();
        if self.db.path().is_some() {
            if let Err(e) = self.db.checkpoint() {
                tracing::warn!(error = %e, "checkpoint on shutdown failed");
            }
        }
        tracing::info!("footprint engine shut down");
    }
}

/// Cutoff for "newer than `count` units ago". `None` means everything.
pub fn recent_cutoff(
    now: Timestamp,
    count: u32,
    unit: &str,
) -> Result<Option<Timestamp>, RequestError> {
    let span = i64::from(count);
    match unit {
        "h" => Ok(Some(now.saturating_sub(span.saturating_mul(SECONDS_PER_HOUR)))),
        "d" => Ok(Some(now.saturating_sub(span.saturating_mul(SECONDS_PER_DAY)))),
        "m" => Ok(Some(months_before(now, count))),
        "everything" => Ok(None),
        other => Err(RequestError::InvalidTimeUnit {
            unit: other.to_string(),
        }),
    }
}

/// `now` moved back by calendar months. Saturates at the earliest
/// representable date.
pub fn months_before(now: Timestamp, months: u32) -> Timestamp {
    DateTime::<Utc>::from_timestamp(now, 0)
        .and_then(|t| t.checked_sub_months(Months::new(months)))
        .map(|t| t.timestamp())
        .unwrap_or(Timestamp::MIN)
}
