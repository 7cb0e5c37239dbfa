//! PRAGMA configuration for the usage database.
//!
//! The writer runs in WAL mode with NORMAL sync so that pooled readers never
//! block the ingest path. Both sides wait up to `BUSY_TIMEOUT_MS` on a lock.

use footprint_core::errors::StorageError;
use rusqlite::Connection;

const BUSY_TIMEOUT_MS: u32 = 5_000;
/// Negative values are KiB.
const CACHE_SIZE_KIB: i64 = -16_000;

/// Pragmas for the single write connection.
pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    batch(
        conn,
        "write pragmas",
        &format!(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = {CACHE_SIZE_KIB};
             PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};
             PRAGMA temp_store = MEMORY;"
        ),
    )
}

/// Pragmas for pooled read connections. `query_only` turns a stray write
/// through a reader into an error.
pub fn apply_read_pragmas(conn: &Connection) -> Result<(), StorageError> {
    batch(
        conn,
        "read pragmas",
        &format!(
            "PRAGMA query_only = ON;
             PRAGMA cache_size = {CACHE_SIZE_KIB};
             PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ),
    )
}

pub fn verify_wal_mode(conn: &Connection) -> Result<bool, StorageError> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(StorageError::sqlite)?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}

/// Refresh query planner statistics before the writer goes away.
pub fn optimize_on_close(conn: &Connection) -> Result<(), StorageError> {
    batch(
        conn,
        "optimize",
        "PRAGMA analysis_limit = 400; PRAGMA optimize;",
    )
}

fn batch(conn: &Connection, what: &str, sql: &str) -> Result<(), StorageError> {
    conn.execute_batch(sql).map_err(|e| StorageError::SqliteError {
        message: format!("failed to apply {what}: {e}"),
    })
}
