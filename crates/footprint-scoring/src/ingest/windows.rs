//! Per-window bookkeeping: which resources each window opened, and which of
//! them holds the focus.
//!
//! Applications do not always report `Closed` before their window goes away,
//! or `Opened` before focusing a document. The registry lets ingest fill in
//! those events and close everything a window left open.

use std::collections::BTreeMap;

use dashmap::DashMap;
use footprint_core::types::ResourceTriple;

/// Window id of events that do not come from a window.
pub const NO_WINDOW: u64 = 0;

#[derive(Debug, Default)]
struct WindowState {
    /// Resource to the triple it was opened under.
    resources: BTreeMap<String, ResourceTriple>,
    focussed: Option<String>,
}

#[derive(Default)]
pub struct WindowRegistry {
    windows: DashMap<u64, WindowState>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `triple` as opened in `window_id`. Returns `false` if the window
    /// already had that resource.
    pub fn register(&self, window_id: u64, triple: &ResourceTriple) -> bool {
        let mut window = self.windows.entry(window_id).or_default();
        if window.resources.contains_key(&triple.resource) {
            return false;
        }
        window
            .resources
            .insert(triple.resource.clone(), triple.clone());
        true
    }

    pub fn contains(&self, window_id: u64, resource: &str) -> bool {
        self.windows
            .get(&window_id)
            .is_some_and(|w| w.resources.contains_key(resource))
    }

    /// Give `resource` the focus of `window_id`.
    pub fn focus(&self, window_id: u64, resource: &str) {
        self.windows.entry(window_id).or_default().focussed = Some(resource.to_string());
    }

    /// Focus `resource` unless the window already has a focussed resource.
    pub fn focus_if_unfocussed(&self, window_id: u64, resource: &str) -> bool {
        let mut window = self.windows.entry(window_id).or_default();
        if window.focussed.is_some() {
            return false;
        }
        window.focussed = Some(resource.to_string());
        true
    }

    /// Clear the focus if `resource` holds it.
    pub fn release_focus(&self, window_id: u64, resource: &str) -> bool {
        match self.windows.get_mut(&window_id) {
            Some(mut window) if window.focussed.as_deref() == Some(resource) => {
                window.focussed = None;
                true
            }
            _ => false,
        }
    }

    pub fn focussed(&self, window_id: u64) -> Option<String> {
        self.windows.get(&window_id).and_then(|w| w.focussed.clone())
    }

    /// Forget `resource` in `window_id` after it was closed.
    pub fn unregister(&self, window_id: u64, resource: &str) {
        if let Some(mut window) = self.windows.get_mut(&window_id) {
            window.resources.remove(resource);
        }
    }

    /// Drop the window and return the triples it still had open.
    pub fn remove_window(&self, window_id: u64) -> Vec<ResourceTriple> {
        self.windows
            .remove(&window_id)
            .map(|(_, window)| window.resources.into_values().collect())
            .unwrap_or_default()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}
