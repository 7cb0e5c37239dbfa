//! Queries for the ResourceEvent table: usage intervals per triple.

use footprint_core::errors::StorageError;
use footprint_core::types::{ResourceTriple, Timestamp};
use rusqlite::{params, Connection, OptionalExtension};

/// A stored interval. `end` is `None` while the interval is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl Interval {
    /// Length in seconds, `None` while open.
    pub fn length(&self) -> Option<i64> {
        self.end.map(|end| end - self.start)
    }
}

/// Insert a new interval row.
pub fn insert_event(
    conn: &Connection,
    triple: &ResourceTriple,
    start: Timestamp,
    end: Option<Timestamp>,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO ResourceEvent
                (usedActivity, initiatingAgent, targettedResource, start, end)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .map_err(StorageError::sqlite)?;
    stmt.execute(params![
        triple.activity,
        triple.agent,
        triple.resource,
        start,
        end
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Close the most recent open interval of `triple`.
/// Returns `false` when there was nothing to close.
pub fn close_latest_open(
    conn: &Connection,
    triple: &ResourceTriple,
    end: Timestamp,
) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "UPDATE ResourceEvent SET end = ?4
             WHERE rowid = (
                SELECT rowid FROM ResourceEvent
                WHERE usedActivity = ?1 AND initiatingAgent = ?2
                  AND targettedResource = ?3 AND end IS NULL
                ORDER BY start DESC, rowid DESC
                LIMIT 1
             )",
        )
        .map_err(StorageError::sqlite)?;
    let changed = stmt
        .execute(params![triple.activity, triple.agent, triple.resource, end])
        .map_err(StorageError::sqlite)?;
    Ok(changed > 0)
}

/// Whether `triple` currently has an open interval.
pub fn has_open(conn: &Connection, triple: &ResourceTriple) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT 1 FROM ResourceEvent
             WHERE usedActivity = ?1 AND initiatingAgent = ?2
               AND targettedResource = ?3 AND end IS NULL
             LIMIT 1",
        )
        .map_err(StorageError::sqlite)?;
    let found: Option<i64> = stmt
        .query_row(params![triple.activity, triple.agent, triple.resource], |row| {
            row.get(0)
        })
        .optional()
        .map_err(StorageError::sqlite)?;
    Ok(found.is_some())
}

/// Intervals of `triple` that started strictly after `since`, oldest first.
pub fn intervals_since(
    conn: &Connection,
    triple: &ResourceTriple,
    since: Timestamp,
) -> Result<Vec<Interval>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT start, end FROM ResourceEvent
             WHERE usedActivity = ?1 AND initiatingAgent = ?2
               AND targettedResource = ?3 AND start > ?4
             ORDER BY start ASC, rowid ASC",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(
            params![triple.activity, triple.agent, triple.resource, since],
            |row| {
                Ok(Interval {
                    start: row.get(0)?,
                    end: row.get(1)?,
                })
            },
        )
        .map_err(StorageError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}

/// Count stored intervals, optionally restricted to one activity.
pub fn count_events(conn: &Connection, activity: Option<&str>) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM ResourceEvent WHERE (?1 IS NULL OR usedActivity = ?1)",
            params![activity],
            |row| row.get(0),
        )
        .map_err(StorageError::sqlite)?;
    Ok(count as u64)
}
