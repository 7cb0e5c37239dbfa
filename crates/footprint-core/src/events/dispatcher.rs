//! EventDispatcher: synchronous event dispatch with zero overhead when empty.

use std::sync::Arc;

use super::handler::ScoreEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// Handlers are registered while the engine is being wired; the dispatcher
/// is then shared behind an `Arc` and only read.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn ScoreEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn ScoreEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler does not prevent subsequent handlers
    /// from receiving the event.
    fn emit<F: Fn(&dyn ScoreEventHandler)>(&self, name: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::error!(event = name, "event handler panicked");
            }
        }
    }

    pub fn emit_score_updated(&self, event: &ScoreUpdatedEvent) {
        self.emit("score_updated", |h| h.on_score_updated(event));
    }

    pub fn emit_stats_deleted(&self, event: &StatsDeletedEvent) {
        self.emit("stats_deleted", |h| h.on_stats_deleted(event));
    }

    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit("error", |h| h.on_error(event));
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter(AtomicUsize);

    impl ScoreEventHandler for Counter {
        fn on_score_updated(&self, _event: &ScoreUpdatedEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Panicker;

    impl ScoreEventHandler for Panicker {
        fn on_score_updated(&self, _event: &ScoreUpdatedEvent) {
            panic!("handler failure");
        }
    }

    fn event() -> ScoreUpdatedEvent {
        ScoreUpdatedEvent {
            activity: "A1".into(),
            agent: "editor".into(),
            resource: "/doc.txt".into(),
            score: 1.0,
            last_update: 0,
            first_update: 0,
        }
    }

    #[test]
    fn empty_dispatcher_is_noop() {
        let d = EventDispatcher::new();
        assert_eq!(d.handler_count(), 0);
        d.emit_score_updated(&event());
    }

    #[test]
    fn panicking_handler_does_not_block_others() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let mut d = EventDispatcher::new();
        d.register(Arc::new(Panicker));
        d.register(counter.clone());

        d.emit_score_updated(&event());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
