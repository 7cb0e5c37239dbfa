//! Event system: handler trait, event payloads, and synchronous dispatcher.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::ScoreEventHandler;
pub use types::*;
