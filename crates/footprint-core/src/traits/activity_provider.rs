//! ActivityProvider trait: the engine's view of the activity manager.

use std::sync::RwLock;

/// Source of the current activity and the set of known activities.
///
/// The activity lifecycle lives outside this crate; the engine only reads it.
pub trait ActivityProvider: Send + Sync {
    /// Identifier of the current activity, or an empty string when none is running.
    fn current_activity(&self) -> String;

    /// Identifiers of every activity the manager knows about.
    fn list_activities(&self) -> Vec<String>;

    /// Whether `activity` is known.
    fn is_known(&self, activity: &str) -> bool {
        self.list_activities().iter().any(|a| a == activity)
    }
}

/// Fixed activity set with a switchable current activity.
///
/// Used by embedders without an activity manager and throughout the tests.
#[derive(Debug, Default)]
pub struct StaticActivityProvider {
    current: RwLock<String>,
    activities: RwLock<Vec<String>>,
}

impl StaticActivityProvider {
    pub fn new<I, S>(current: &str, activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list: Vec<String> = activities.into_iter().map(Into::into).collect();
        if !current.is_empty() && !list.iter().any(|a| a == current) {
            list.push(current.to_string());
        }
        Self {
            current: RwLock::new(current.to_string()),
            activities: RwLock::new(list),
        }
    }

    /// Switch the current activity, registering it if it is new.
    pub fn set_current(&self, activity: &str) {
        if let Ok(mut list) = self.activities.write() {
            if !activity.is_empty() && !list.iter().any(|a| a == activity) {
                list.push(activity.to_string());
            }
        }
        if let Ok(mut current) = self.current.write() {
            *current = activity.to_string();
        }
    }
}

impl ActivityProvider for StaticActivityProvider {
    fn current_activity(&self) -> String {
        self.current
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn list_activities(&self) -> Vec<String> {
        self.activities
            .read()
            .map(|l| l.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_always_known() {
        let provider = StaticActivityProvider::new("A1", ["A2"]);
        assert!(provider.is_known("A1"));
        assert!(provider.is_known("A2"));
        assert!(!provider.is_known("A3"));

        provider.set_current("A3");
        assert_eq!(provider.current_activity(), "A3");
        assert!(provider.is_known("A3"));
    }
}
