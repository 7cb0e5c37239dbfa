//! # footprint-core
//!
//! Foundation crate for the Footprint usage-scoring engine.
//! Defines identifiers, errors, config, events, collaborator traits,
//! tracing setup, and constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod traits;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::FootprintConfig;
pub use errors::{ConfigError, EngineError, RequestError, StorageError};
pub use types::{EventType, Filter, RawEvent, ResourceTriple, Timestamp};
