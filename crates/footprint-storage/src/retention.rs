//! Purges of stored usage history.
//!
//! Every purge is scoped by an optional activity and agent and touches the
//! two history tables:
//! - `ResourceEvent`, selected by interval end,
//! - `ResourceScoreCache`, selected by first or last update.
//!
//! `ResourceLink` is user intent, not history, and is never purged here.

use rusqlite::types::ToSql;
use rusqlite::{params, Connection};
use serde::Serialize;

use footprint_core::errors::StorageError;
use footprint_core::types::Timestamp;

/// Which activity/agent a purge applies to. `None` means every value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeScope {
    pub activity: Option<String>,
    pub agent: Option<String>,
}

impl PurgeScope {
    /// Every activity and agent.
    pub fn all() -> Self {
        Self::default()
    }

    /// One activity, every agent.
    pub fn activity(activity: impl Into<String>) -> Self {
        Self {
            activity: Some(activity.into()),
            agent: None,
        }
    }
}

/// Report of what was cleaned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RetentionReport {
    pub total_deleted: u64,
    pub per_table: Vec<TableCleanup>,
    pub duration_ms: u64,
}

impl RetentionReport {
    /// Rows deleted from `table`.
    pub fn deleted_from(&self, table: &str) -> u64 {
        self.per_table
            .iter()
            .filter(|t| t.table == table)
            .map(|t| t.deleted)
            .sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCleanup {
    pub table: String,
    pub deleted: u64,
}

pub const EVENTS_TABLE: &str = "ResourceEvent";
pub const SCORES_TABLE: &str = "ResourceScoreCache";

/// Delete history newer than `cutoff`: events ending after it and score rows
/// created after it. `None` deletes everything in scope.
pub fn purge_recent(
    conn: &Connection,
    scope: &PurgeScope,
    cutoff: Option<Timestamp>,
) -> Result<RetentionReport, StorageError> {
    run_purge(conn, |conn, report| {
        delete_scoped(conn, EVENTS_TABLE, "(?3 IS NULL OR end > ?3)", scope, &cutoff, report)?;
        delete_scoped(
            conn,
            SCORES_TABLE,
            "(?3 IS NULL OR firstUpdate > ?3)",
            scope,
            &cutoff,
            report,
        )
    })
}

/// Delete history older than `cutoff`: closed events ending before it and
/// score rows last updated before it.
pub fn purge_earlier(
    conn: &Connection,
    scope: &PurgeScope,
    cutoff: Timestamp,
) -> Result<RetentionReport, StorageError> {
    run_purge(conn, |conn, report| {
        delete_scoped(
            conn,
            EVENTS_TABLE,
            "end IS NOT NULL AND end < ?3",
            scope,
            &cutoff,
            report,
        )?;
        delete_scoped(conn, SCORES_TABLE, "lastUpdate < ?3", scope, &cutoff, report)
    })
}

/// Delete all history of resources matching a `LIKE` pattern that uses `\`
/// as its escape character.
pub fn purge_resource(
    conn: &Connection,
    scope: &PurgeScope,
    like_pattern: &str,
) -> Result<RetentionReport, StorageError> {
    let condition = r"targettedResource LIKE ?3 ESCAPE '\'";
    run_purge(conn, |conn, report| {
        delete_scoped(conn, EVENTS_TABLE, condition, scope, &like_pattern, report)?;
        delete_scoped(conn, SCORES_TABLE, condition, scope, &like_pattern, report)
    })
}

/// Startup retention: drop everything older than `cutoff` in every activity.
pub fn apply_retention(conn: &Connection, cutoff: Timestamp) -> Result<RetentionReport, StorageError> {
    let report = purge_earlier(conn, &PurgeScope::all(), cutoff)?;
    tracing::info!(
        cutoff,
        total_deleted = report.total_deleted,
        duration_ms = report.duration_ms,
        "history retention applied"
    );
    Ok(report)
}

/// Run `body` inside one transaction and finish the report.
fn run_purge<F>(conn: &Connection, body: F) -> Result<RetentionReport, StorageError>
where
    F: FnOnce(&Connection, &mut RetentionReport) -> Result<(), StorageError>,
{
    let start = std::time::Instant::now();
    let mut report = RetentionReport::default();

    // RAII transaction: auto-rollback on drop, auto-commit on .commit()
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| StorageError::SqliteError {
            message: format!("purge begin: {e}"),
        })?;

    body(&*tx, &mut report)?;

    tx.commit().map_err(StorageError::sqlite)?;

    report.duration_ms = start.elapsed().as_millis() as u64;
    report.total_deleted = report.per_table.iter().map(|t| t.deleted).sum();
    Ok(report)
}

/// Delete rows from `table` in `scope` that satisfy `condition`, which
/// refers to `value` as `?3`.
fn delete_scoped(
    conn: &Connection,
    table: &str,
    condition: &str,
    scope: &PurgeScope,
    value: &dyn ToSql,
    report: &mut RetentionReport,
) -> Result<(), StorageError> {
    // Table names and conditions are constants from this module.
    let sql = format!(
        "DELETE FROM {table}
         WHERE (?1 IS NULL OR usedActivity = ?1)
           AND (?2 IS NULL OR initiatingAgent = ?2)
           AND {condition}"
    );
    let deleted = conn
        .execute(&sql, params![scope.activity, scope.agent, value])
        .map_err(|e| StorageError::SqliteError {
            message: format!("{table}: {e}"),
        })? as u64;

    if deleted > 0 {
        report.per_table.push(TableCleanup {
            table: table.to_string(),
            deleted,
        });
    }
    Ok(())
}
