//! Purge tests against the real migrated schema.

use footprint_core::types::ResourceTriple;
use footprint_storage::migrations::run_migrations;
use footprint_storage::queries::{resource_events, score_cache};
use footprint_storage::retention::{
    purge_earlier, purge_recent, purge_resource, PurgeScope, EVENTS_TABLE, SCORES_TABLE,
};
use rusqlite::{params, Connection};

const DAY: i64 = 86_400;
const NOW: i64 = 1_700_000_000;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn add_event(conn: &Connection, activity: &str, resource: &str, start: i64, end: Option<i64>) {
    let t = ResourceTriple::new(activity, "kate", resource);
    resource_events::insert_event(conn, &t, start, end).unwrap();
}

fn add_score(conn: &Connection, activity: &str, resource: &str, first: i64, last: i64) {
    let t = ResourceTriple::new(activity, "kate", resource);
    score_cache::ensure_row(conn, &t, first).unwrap();
    score_cache::update_score(conn, &t, 1.0, last).unwrap();
}

fn remaining_events(conn: &Connection, activity: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(
            "SELECT targettedResource FROM ResourceEvent
             WHERE usedActivity = ?1 ORDER BY targettedResource",
        )
        .unwrap();
    stmt.query_map(params![activity], |r| r.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn recent_purge_week_in_one_activity() {
    let conn = setup_db();
    let cutoff = NOW - 7 * DAY;

    add_event(&conn, "A1", "/eight-days", NOW - 8 * DAY, Some(NOW - 8 * DAY + 60));
    add_event(&conn, "A1", "/one-day", NOW - DAY, Some(NOW - DAY + 60));
    add_event(&conn, "A2", "/one-day-other", NOW - DAY, Some(NOW - DAY + 60));
    add_score(&conn, "A1", "/eight-days", NOW - 8 * DAY, NOW - 8 * DAY);
    add_score(&conn, "A1", "/one-day", NOW - DAY, NOW - DAY);
    add_score(&conn, "A2", "/one-day-other", NOW - DAY, NOW - DAY);

    let report = purge_recent(&conn, &PurgeScope::activity("A1"), Some(cutoff)).unwrap();

    assert_eq!(report.deleted_from(EVENTS_TABLE), 1);
    assert_eq!(report.deleted_from(SCORES_TABLE), 1);
    assert_eq!(remaining_events(&conn, "A1"), vec!["/eight-days"]);
    assert_eq!(remaining_events(&conn, "A2"), vec!["/one-day-other"]);
    assert_eq!(score_cache::count_scores(&conn, Some("A1")).unwrap(), 1);
    assert_eq!(score_cache::count_scores(&conn, Some("A2")).unwrap(), 1);
}

#[test]
fn earlier_purge_all_activities() {
    let conn = setup_db();
    add_event(&conn, "A1", "/old", NOW - 90 * DAY, Some(NOW - 90 * DAY + 10));
    add_event(&conn, "A2", "/old", NOW - 90 * DAY, Some(NOW - 90 * DAY + 10));
    add_event(&conn, "A1", "/fresh", NOW - DAY, Some(NOW - DAY + 10));
    add_score(&conn, "A1", "/old", NOW - 90 * DAY, NOW - 90 * DAY);
    add_score(&conn, "A1", "/fresh", NOW - 90 * DAY, NOW - DAY);

    let report = purge_earlier(&conn, &PurgeScope::all(), NOW - 30 * DAY).unwrap();

    assert_eq!(report.deleted_from(EVENTS_TABLE), 2);
    assert_eq!(report.deleted_from(SCORES_TABLE), 1);
    assert_eq!(remaining_events(&conn, "A1"), vec!["/fresh"]);
    assert!(remaining_events(&conn, "A2").is_empty());
}

#[test]
fn resource_purge_respects_agent_scope() {
    let conn = setup_db();
    add_event(&conn, "A1", "/home/u/a.txt", 1, Some(2));
    let vim = ResourceTriple::new("A1", "vim", "/home/u/b.txt");
    resource_events::insert_event(&conn, &vim, 1, Some(2)).unwrap();

    let scope = PurgeScope {
        activity: None,
        agent: Some("vim".to_string()),
    };
    let report = purge_resource(&conn, &scope, "/home/u/%").unwrap();

    assert_eq!(report.total_deleted, 1);
    assert_eq!(remaining_events(&conn, "A1"), vec!["/home/u/a.txt"]);
}
