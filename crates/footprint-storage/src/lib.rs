//! # footprint-storage
//!
//! SQLite persistence for the usage-scoring engine: a serialized writer plus
//! read pool, `user_version` migrations, per-table query modules, the
//! `EventStore` component, and purge/retention.

pub mod connection;
pub mod event_store;
pub mod migrations;
pub mod queries;
pub mod retention;

pub use connection::DatabaseManager;
pub use event_store::{EventStore, Interval};
pub use retention::{PurgeScope, RetentionReport, TableCleanup};
