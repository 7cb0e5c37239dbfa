//! Per-table query modules. Every function takes a borrowed connection so
//! callers choose between the writer, a pooled reader, or a transaction.

pub mod resource_events;
pub mod resource_links;
pub mod score_cache;
