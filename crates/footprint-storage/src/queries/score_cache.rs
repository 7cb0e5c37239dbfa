//! Queries for the ResourceScoreCache table.

use footprint_core::constants::NEVER_UPDATED;
use footprint_core::errors::StorageError;
use footprint_core::types::{RankedResource, ResourceTriple, Timestamp};
use rusqlite::{params, Connection, OptionalExtension};

/// A cached score row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRow {
    pub triple: ResourceTriple,
    pub score_type: i64,
    pub cached_score: f64,
    pub first_update: Timestamp,
    pub last_update: Timestamp,
}

impl ScoreRow {
    pub fn never_updated(&self) -> bool {
        self.last_update == NEVER_UPDATED
    }
}

/// Create the row for `triple` if it does not exist yet.
pub fn ensure_row(
    conn: &Connection,
    triple: &ResourceTriple,
    now: Timestamp,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT OR IGNORE INTO ResourceScoreCache
                (usedActivity, initiatingAgent, targettedResource,
                 scoreType, cachedScore, firstUpdate, lastUpdate)
             VALUES (?1, ?2, ?3, 0, 0.0, ?4, ?5)",
        )
        .map_err(StorageError::sqlite)?;
    stmt.execute(params![
        triple.activity,
        triple.agent,
        triple.resource,
        now,
        NEVER_UPDATED
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Fetch the row for `triple`.
pub fn get_score(
    conn: &Connection,
    triple: &ResourceTriple,
) -> Result<Option<ScoreRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT scoreType, cachedScore, firstUpdate, lastUpdate
             FROM ResourceScoreCache
             WHERE usedActivity = ?1 AND initiatingAgent = ?2 AND targettedResource = ?3",
        )
        .map_err(StorageError::sqlite)?;
    stmt.query_row(params![triple.activity, triple.agent, triple.resource], |row| {
        Ok(ScoreRow {
            triple: triple.clone(),
            score_type: row.get(0)?,
            cached_score: row.get(1)?,
            first_update: row.get(2)?,
            last_update: row.get(3)?,
        })
    })
    .optional()
    .map_err(StorageError::sqlite)
}

/// Write back a recomputed score.
pub fn update_score(
    conn: &Connection,
    triple: &ResourceTriple,
    score: f64,
    last_update: Timestamp,
) -> Result<(), StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "UPDATE ResourceScoreCache SET cachedScore = ?4, lastUpdate = ?5
             WHERE usedActivity = ?1 AND initiatingAgent = ?2 AND targettedResource = ?3",
        )
        .map_err(StorageError::sqlite)?;
    stmt.execute(params![
        triple.activity,
        triple.agent,
        triple.resource,
        score,
        last_update
    ])
    .map_err(StorageError::sqlite)?;
    Ok(())
}

/// Highest-scoring resources, optionally restricted to one activity and/or agent.
/// A resource scored under several triples appears once, with its best score.
pub fn top_resources(
    conn: &Connection,
    activity: Option<&str>,
    agent: Option<&str>,
    limit: usize,
) -> Result<Vec<RankedResource>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT targettedResource, MAX(cachedScore) AS score
             FROM ResourceScoreCache
             WHERE (?1 IS NULL OR usedActivity = ?1)
               AND (?2 IS NULL OR initiatingAgent = ?2)
               AND cachedScore > 0
             GROUP BY targettedResource
             ORDER BY score DESC, targettedResource ASC
             LIMIT ?3",
        )
        .map_err(StorageError::sqlite)?;

    let rows = stmt
        .query_map(params![activity, agent, limit as i64], |row| {
            Ok(RankedResource {
                resource: row.get(0)?,
                score: row.get(1)?,
            })
        })
        .map_err(StorageError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StorageError::sqlite)
}

/// Score of `resource` as `top_resources` ranks it under the same filters:
/// the best score across the matching triples.
pub fn best_score(
    conn: &Connection,
    activity: Option<&str>,
    agent: Option<&str>,
    resource: &str,
) -> Result<Option<f64>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT MAX(cachedScore)
             FROM ResourceScoreCache
             WHERE (?1 IS NULL OR usedActivity = ?1)
               AND (?2 IS NULL OR initiatingAgent = ?2)
               AND targettedResource = ?3",
        )
        .map_err(StorageError::sqlite)?;
    stmt.query_row(params![activity, agent, resource], |row| row.get(0))
        .map_err(StorageError::sqlite)
}

/// Count score rows, optionally restricted to one activity.
pub fn count_scores(conn: &Connection, activity: Option<&str>) -> Result<u64, StorageError> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM ResourceScoreCache WHERE (?1 IS NULL OR usedActivity = ?1)",
            params![activity],
            |row| row.get(0),
        )
        .map_err(StorageError::sqlite)?;
    Ok(count as u64)
}
