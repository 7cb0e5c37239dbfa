//! EventIngest: the acceptance pipeline from raw events to stored intervals.
//!
//! Each event passes, in order: empty-field checks, the off-the-record check
//! on the current activity, the application mode, URI normalization, the
//! blocklist, and duplicate suppression. Accepted events are turned into
//! interval writes and rescore requests. Events carrying a window id also
//! update the [`WindowRegistry`], which supplies a missing `Opened` before a
//! focus and closes whatever a window left open when it goes away.

pub mod filter;
pub mod glob;
pub mod uri;
pub mod windows;

use std::sync::{Arc, Mutex};

use footprint_core::traits::ActivityProvider;
use footprint_core::types::{EventType, RawEvent, ResourceTriple, Timestamp};
use footprint_storage::EventStore;

pub use self::filter::EventFilter;
pub use self::windows::{WindowRegistry, NO_WINDOW};
use crate::maintainer::ScoreMaintainer;

/// Why an event was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EmptyAgent,
    EmptyResource,
    UnknownEventType,
    OffTheRecord,
    ApplicationNotRemembered,
    UnresolvableUri,
    Blocklisted,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    Dropped(DropReason),
}

impl IngestOutcome {
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Identity of the last accepted event, for duplicate suppression.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EventFingerprint {
    application: String,
    window_id: u64,
    uri: String,
    event_type: EventType,
    timestamp: Timestamp,
}

pub struct EventIngest {
    store: EventStore,
    filter: Arc<EventFilter>,
    maintainer: Arc<ScoreMaintainer>,
    activities: Arc<dyn ActivityProvider>,
    windows: WindowRegistry,
    last_accepted: Mutex<Option<EventFingerprint>>,
}

impl EventIngest {
    pub fn new(
        store: EventStore,
        filter: Arc<EventFilter>,
        maintainer: Arc<ScoreMaintainer>,
        activities: Arc<dyn ActivityProvider>,
    ) -> Self {
        Self {
            store,
            filter,
            maintainer,
            activities,
            windows: WindowRegistry::new(),
            last_accepted: Mutex::new(None),
        }
    }

    pub fn filter(&self) -> &Arc<EventFilter> {
        &self.filter
    }

    pub fn windows(&self) -> &WindowRegistry {
        &self.windows
    }

    /// Entry point for transports that carry the numeric event code.
    pub fn add_raw(
        &self,
        application: &str,
        window_id: u64,
        uri: &str,
        event_code: i32,
        timestamp: Timestamp,
    ) -> IngestOutcome {
        match EventType::from_code(event_code) {
            Some(event_type) => self.add_event(RawEvent::new(
                application,
                window_id,
                uri,
                event_type,
                timestamp,
            )),
            None => drop_event(DropReason::UnknownEventType, application, uri),
        }
    }

    /// Ingest a batch. Returns how many events were accepted.
    pub fn add_events<I>(&self, events: I) -> usize
    where
        I: IntoIterator<Item = RawEvent>,
    {
        events
            .into_iter()
            .map(|event| self.add_event(event))
            .filter(|outcome| outcome.is_accepted())
            .count()
    }

    pub fn add_event(&self, event: RawEvent) -> IngestOutcome {
        if event.application.is_empty() {
            return drop_event(DropReason::EmptyAgent, &event.application, &event.uri);
        }
        if event.uri.is_empty() {
            return drop_event(DropReason::EmptyResource, &event.application, &event.uri);
        }

        let activity = self.activities.current_activity();
        if self.filter.is_off_the_record(&activity) {
            return drop_event(DropReason::OffTheRecord, &event.application, &event.uri);
        }
        if !self.filter.accepts_application(&event.application) {
            return drop_event(
                DropReason::ApplicationNotRemembered,
                &event.application,
                &event.uri,
            );
        }

        let resource = match uri::normalize(&event.uri) {
            Ok(resource) => resource,
            Err(_) => {
                return drop_event(DropReason::UnresolvableUri, &event.application, &event.uri)
            }
        };
        if self.filter.is_blocked(&resource) {
            return drop_event(DropReason::Blocklisted, &event.application, &resource);
        }

        let fingerprint = EventFingerprint {
            application: event.application.clone(),
            window_id: event.window_id,
            uri: resource.clone(),
            event_type: event.event_type,
            timestamp: event.timestamp,
        };
        {
            let mut last = self
                .last_accepted
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if last.as_ref() == Some(&fingerprint) {
                return drop_event(DropReason::Duplicate, &event.application, &resource);
            }
            *last = Some(fingerprint);
        }

        let triple = ResourceTriple::new(activity, event.application, resource);
        self.track_window(event.window_id, &triple, event.event_type, event.timestamp);
        self.dispatch(triple, event.event_type, event.timestamp);
        IngestOutcome::Accepted
    }

    /// Close every resource `window_id` still has open, as of the wall clock.
    pub fn window_closed(&self, window_id: u64) -> usize {
        self.window_closed_at(window_id, crate::now())
    }

    /// Close every resource `window_id` still has open at `timestamp` and
    /// queue their rescoring. Returns how many intervals were closed.
    pub fn window_closed_at(&self, window_id: u64, timestamp: Timestamp) -> usize {
        let mut closed = 0;
        for triple in self.windows.remove_window(window_id) {
            if self.store.close_interval(&triple, timestamp) {
                closed += 1;
            }
            self.maintainer.enqueue(triple);
        }
        tracing::debug!(window_id, closed, "window closed");
        closed
    }

    fn track_window(
        &self,
        window_id: u64,
        triple: &ResourceTriple,
        event_type: EventType,
        timestamp: Timestamp,
    ) {
        if window_id == NO_WINDOW {
            return;
        }
        match event_type {
            EventType::Opened => {
                self.windows.register(window_id, triple);
                self.windows.focus_if_unfocussed(window_id, &triple.resource);
            }
            EventType::FocussedIn => {
                if self.windows.register(window_id, triple) {
                    tracing::debug!(%triple, window_id, "focus on a resource never opened, opening it");
                    self.dispatch(triple.clone(), EventType::Opened, timestamp);
                }
                self.windows.focus(window_id, &triple.resource);
            }
            EventType::Closed => {
                if self.windows.release_focus(window_id, &triple.resource) {
                    tracing::trace!(%triple, window_id, "focus released by close");
                }
                self.windows.unregister(window_id, &triple.resource);
            }
            EventType::FocussedOut => {
                self.windows.release_focus(window_id, &triple.resource);
            }
            EventType::Accessed | EventType::Modified | EventType::UserUpdateScore => {}
        }
    }

    fn dispatch(&self, triple: ResourceTriple, event_type: EventType, timestamp: Timestamp) {
        match event_type {
            EventType::Accessed => {
                self.store.open_interval(&triple, timestamp, Some(timestamp));
            }
            EventType::Opened => {
                if self.store.has_open_interval(&triple) {
                    tracing::debug!(%triple, "already open, ignoring");
                } else {
                    self.store.open_interval(&triple, timestamp, None);
                }
            }
            EventType::Closed => {
                self.store.close_interval(&triple, timestamp);
            }
            EventType::UserUpdateScore => {}
            EventType::Modified | EventType::FocussedIn | EventType::FocussedOut => {
                tracing::trace!(%triple, ?event_type, "no storage effect");
            }
        }

        if event_type.triggers_rescore() {
            self.maintainer.enqueue(triple);
        }
    }
}

fn drop_event(reason: DropReason, application: &str, uri: &str) -> IngestOutcome {
    tracing::debug!(?reason, application, uri, "event dropped");
    IngestOutcome::Dropped(reason)
}
