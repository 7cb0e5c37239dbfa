//! Collaborator traits consumed by the scoring engine.

pub mod activity_provider;
pub mod cancellation;
pub mod notification_sink;

pub use activity_provider::{ActivityProvider, StaticActivityProvider};
pub use cancellation::{Cancellable, CancellationToken};
pub use notification_sink::{CollectingSink, NotificationSink};
