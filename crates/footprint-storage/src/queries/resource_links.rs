//! Queries for the ResourceLink table.

use footprint_core::errors::StorageError;
use footprint_core::types::ResourceTriple;
use rusqlite::{params, Connection, OptionalExtension};

/// Link a resource. Returns `false` if the link already existed.
pub fn insert_link(conn: &Connection, triple: &ResourceTriple) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO ResourceLink
                (usedActivity, initiatingAgent, targettedResource)
             VALUES (?1, ?2, ?3)",
        )
        .map_err(StorageError::sqlite)?;
    let changed = stmt
        .execute(params![triple.activity, triple.agent, triple.resource])
        .map_err(StorageError::sqlite)?;
    Ok(changed > 0)
}

/// Remove a link. Returns `false` if there was none.
pub fn delete_link(conn: &Connection, triple: &ResourceTriple) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "DELETE FROM ResourceLink
             WHERE usedActivity = ?1 AND initiatingAgent = ?2 AND targettedResource = ?3",
        )
        .map_err(StorageError::sqlite)?;
    let changed = stmt
        .execute(params![triple.activity, triple.agent, triple.resource])
        .map_err(StorageError::sqlite)?;
    Ok(changed > 0)
}

pub fn is_linked(conn: &Connection, triple: &ResourceTriple) -> Result<bool, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT 1 FROM ResourceLink
             WHERE usedActivity = ?1 AND initiatingAgent = ?2 AND targettedResource = ?3",
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

/// Every link stored for `activity`, ordered by resource.
pub fn links_for_activity(
    conn: &Connection,
    activity: &str,
) -> Result<Vec<ResourceTriple>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT usedActivity, initiatingAgent, targettedResource
             FROM ResourceLink WHERE usedActivity = ?1
             ORDER BY targettedResource, initiatingAgent",
        )
        .map_err(StorageError::sqlite)?;
    let rows = stmt
        .query_map(params![activity], |row| {
            Ok(ResourceTriple {
                activity: row.get(0)?,
                agent: row.get(1)?,
                resource: row.get(2)?,
            })
        })
        .map_err(StorageError::sqlite)?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}
