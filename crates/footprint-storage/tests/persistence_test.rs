//! File-backed persistence tests for footprint-storage.
//! Verifies data survives close/reopen, WAL mode is active, migrations are
//! idempotent, and the read pool sees committed writes.

use footprint_core::types::ResourceTriple;
use footprint_storage::connection::pragmas;
use footprint_storage::connection::DatabaseManager;
use footprint_storage::migrations::{self, run_migrations, LATEST_VERSION};
use footprint_storage::queries::{resource_events, resource_links, score_cache};
use rusqlite::Connection;
use tempfile::tempdir;

fn triple() -> ResourceTriple {
    ResourceTriple::new("A1", "org.kde.okular", "/home/u/paper.pdf")
}

#[test]
fn events_survive_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("footprint.sqlite");

    {
        let db = DatabaseManager::open(&db_path, 2).unwrap();
        db.with_writer(|conn| resource_events::insert_event(conn, &triple(), 100, Some(230)))
            .unwrap();
    }

    let db = DatabaseManager::open(&db_path, 2).unwrap();
    let intervals = db
        .with_reader(|conn| resource_events::intervals_since(conn, &triple(), -1))
        .unwrap();
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].length(), Some(130));
}

#[test]
fn wal_mode_active_for_file_db() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("footprint.sqlite");
    let db = DatabaseManager::open(&db_path, 1).unwrap();

    let wal = db.with_writer(pragmas::verify_wal_mode).unwrap();
    assert!(wal);
    assert_eq!(db.reader_count(), 1);
    assert_eq!(db.path(), Some(db_path.as_path()));
    db.checkpoint().unwrap();
}

#[test]
fn migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(migrations::current_version(&conn).unwrap(), LATEST_VERSION);
}

#[test]
fn read_pool_sees_committed_writes() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("footprint.sqlite");
    let db = DatabaseManager::open(&db_path, 4).unwrap();

    db.with_immediate(|tx| {
        score_cache::ensure_row(tx, &triple(), 1_000)?;
        score_cache::update_score(tx, &triple(), 2.5, 1_000)
    })
    .unwrap();

    // The cursor rotates, so each reader is visited once.
    for _ in 0..4 {
        let row = db
            .with_reader(|conn| score_cache::get_score(conn, &triple()))
            .unwrap()
            .unwrap();
        assert_eq!(row.cached_score, 2.5);
        assert!(!row.never_updated());
    }
}

#[test]
fn in_memory_reads_go_through_writer() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert_eq!(db.reader_count(), 0);
    assert!(db.path().is_none());

    db.with_writer(|conn| resource_links::insert_link(conn, &triple()))
        .unwrap();
    let linked = db
        .with_reader(|conn| resource_links::is_linked(conn, &triple()))
        .unwrap();
    assert!(linked);
}

#[test]
fn failed_immediate_transaction_rolls_back() {
    let db = DatabaseManager::open_in_memory().unwrap();

    let result: Result<(), _> = db.with_immediate(|tx| {
        score_cache::ensure_row(tx, &triple(), 1_000)?;
        Err(footprint_core::StorageError::sqlite("forced failure"))
    });
    assert!(result.is_err());

    let row = db
        .with_reader(|conn| score_cache::get_score(conn, &triple()))
        .unwrap();
    assert!(row.is_none());
}

#[test]
fn open_pragmas_on_fresh_connection() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("footprint.sqlite");
    let conn = Connection::open(&db_path).unwrap();
    pragmas::apply_pragmas(&conn).unwrap();
    run_migrations(&conn).unwrap();
    pragmas::optimize_on_close(&conn).unwrap();
}
