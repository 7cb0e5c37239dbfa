//! ScoreEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling scoring events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. The trait requires `Send + Sync`
/// because events are emitted from the maintainer thread.
pub trait ScoreEventHandler: Send + Sync {
    fn on_score_updated(&self, _event: &ScoreUpdatedEvent) {}
    fn on_stats_deleted(&self, _event: &StatsDeletedEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
