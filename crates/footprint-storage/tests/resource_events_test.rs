//! Interval and score-cache query tests against the migrated schema.

use std::sync::Arc;

use footprint_core::types::ResourceTriple;
use footprint_storage::queries::{resource_events, resource_links, score_cache};
use footprint_storage::{DatabaseManager, EventStore};

fn store() -> (Arc<DatabaseManager>, EventStore) {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    (db.clone(), EventStore::new(db))
}

fn doc() -> ResourceTriple {
    ResourceTriple::new("A1", "kate", "/home/u/notes.txt")
}

#[test]
fn close_is_idempotent() {
    let (_db, store) = store();
    store.open_interval(&doc(), 100, None);

    assert!(store.close_interval(&doc(), 200));
    // Second close finds no open interval and changes nothing.
    assert!(!store.close_interval(&doc(), 300));

    let intervals = store.query_intervals_since(&doc(), -1);
    assert_eq!(intervals.len(), 1);
    assert_eq!(intervals[0].end, Some(200));
}

#[test]
fn close_targets_most_recent_open_interval() {
    let (_db, store) = store();
    store.open_interval(&doc(), 100, None);
    store.open_interval(&doc(), 150, None);

    assert!(store.close_interval(&doc(), 200));

    let intervals = store.query_intervals_since(&doc(), -1);
    assert_eq!(intervals[0].start, 100);
    assert_eq!(intervals[0].end, None);
    assert_eq!(intervals[1].start, 150);
    assert_eq!(intervals[1].end, Some(200));
}

#[test]
fn open_interval_lookup_is_per_triple() {
    let (_db, store) = store();
    let other = ResourceTriple::new("A2", "kate", "/home/u/notes.txt");

    store.open_interval(&doc(), 100, None);
    assert!(store.has_open_interval(&doc()));
    assert!(!store.has_open_interval(&other));

    store.close_interval(&doc(), 110);
    assert!(!store.has_open_interval(&doc()));
}

#[test]
fn intervals_since_is_strict_and_ordered() {
    let (_db, store) = store();
    store.open_interval(&doc(), 300, Some(300));
    store.open_interval(&doc(), 100, Some(160));
    store.open_interval(&doc(), 200, Some(260));

    let intervals = store.query_intervals_since(&doc(), 100);
    let starts: Vec<i64> = intervals.iter().map(|i| i.start).collect();
    assert_eq!(starts, vec![200, 300]);
    assert_eq!(intervals[1].length(), Some(0));
}

#[test]
fn ensure_row_creates_sentinel_once() {
    let (db, _store) = store();
    db.with_writer(|conn| {
        score_cache::ensure_row(conn, &doc(), 1_000)?;
        score_cache::ensure_row(conn, &doc(), 2_000)
    })
    .unwrap();

    let row = db
        .with_reader(|conn| score_cache::get_score(conn, &doc()))
        .unwrap()
        .unwrap();
    assert!(row.never_updated());
    assert_eq!(row.first_update, 1_000);
    assert_eq!(row.cached_score, 0.0);
}

#[test]
fn top_resources_groups_by_resource() {
    let (db, _store) = store();
    let rows = [
        (ResourceTriple::new("A1", "kate", "/a"), 1.0),
        (ResourceTriple::new("A1", "vim", "/a"), 3.0),
        (ResourceTriple::new("A1", "kate", "/b"), 2.0),
        (ResourceTriple::new("A2", "kate", "/c"), 9.0),
        (ResourceTriple::new("A1", "kate", "/zero"), 0.0),
    ];
    db.with_writer(|conn| {
        for (t, score) in &rows {
            score_cache::ensure_row(conn, t, 0)?;
            score_cache::update_score(conn, t, *score, 0)?;
        }
        Ok(())
    })
    .unwrap();

    let top = db
        .with_reader(|conn| score_cache::top_resources(conn, Some("A1"), None, 10))
        .unwrap();
    let names: Vec<&str> = top.iter().map(|r| r.resource.as_str()).collect();
    assert_eq!(names, vec!["/a", "/b"]);
    assert_eq!(top[0].score, 3.0);

    let kate_only = db
        .with_reader(|conn| score_cache::top_resources(conn, None, Some("kate"), 2))
        .unwrap();
    assert_eq!(kate_only.len(), 2);
    assert_eq!(kate_only[0].resource, "/c");
}

#[test]
fn links_round_trip() {
    let (db, _store) = store();
    let link = ResourceTriple::new("A1", "", "/home/u/project");

    let inserted = db
        .with_writer(|conn| resource_links::insert_link(conn, &link))
        .unwrap();
    assert!(inserted);
    let again = db
        .with_writer(|conn| resource_links::insert_link(conn, &link))
        .unwrap();
    assert!(!again);

    let links = db
        .with_reader(|conn| resource_links::links_for_activity(conn, "A1"))
        .unwrap();
    assert_eq!(links, vec![link.clone()]);

    let removed = db
        .with_writer(|conn| resource_links::delete_link(conn, &link))
        .unwrap();
    assert!(removed);
    let linked = db
        .with_reader(|conn| resource_links::is_linked(conn, &link))
        .unwrap();
    assert!(!linked);
    let count = db
        .with_reader(|conn| resource_events::count_events(conn, Some("A1")))
        .unwrap();
    assert_eq!(count, 0, "links never create history");
}

#[test]
fn purge_before_is_scoped_to_activity() {
    let (_db, store) = store();
    let other = ResourceTriple::new("A2", "kate", "/home/u/notes.txt");
    store.open_interval(&doc(), 100, Some(150));
    store.open_interval(&doc(), 500, Some(600));
    store.open_interval(&other, 100, Some(150));
    // Still open, so never purged by age.
    store.open_interval(&doc(), 120, None);

    let report = store.purge_before(Some("A1"), 300);
    assert_eq!(report.deleted_from(footprint_storage::retention::EVENTS_TABLE), 1);

    let remaining: Vec<_> = store
        .query_intervals_since(&doc(), -1)
        .into_iter()
        .map(|i| i.start)
        .collect();
    assert_eq!(remaining, vec![120, 500]);
    assert_eq!(store.query_intervals_since(&other, -1).len(), 1);
}
