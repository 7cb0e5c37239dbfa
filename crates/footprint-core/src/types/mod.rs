//! Shared domain types.

pub mod event;
pub mod identifiers;
pub mod ranking;

pub use event::{EventType, RawEvent};
pub use identifiers::{ActivityId, AgentId, Filter, ResourceTriple, ResourceUri, Timestamp};
pub use ranking::{RankedResource, RankingNotification, UpdateMode};
