//! Display preferences

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{Widget, WidgetResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const PREFERENCES_KEY: &str = "display";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

fn default_dark_mode() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
        }
    }
}

pub struct PreferenceStore {
    ns: Namespace,
    current: Preferences,
}

impl Widget for PreferenceStore {
    const NAMESPACE: &'static str = "preferences";

    fn reset(&mut self) {
        self.current = Preferences::default();
    }
}

impl PreferenceStore {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let current: Preferences = ns.load_or_default(PREFERENCES_KEY);

        tracing::debug!(dark_mode = current.dark_mode, "Preferences loaded");
        Self { ns, current }
    }

    pub fn get(&self) -> Preferences {
        self.current
    }

    pub fn set(&mut self, next: Preferences) -> WidgetResult<Preferences> {
        self.ns.save(PREFERENCES_KEY, &next)?;
        self.current = next;

        tracing::info!(dark_mode = next.dark_mode, "Preferences updated");
        Ok(next)
    }

    /// Flip dark mode, returning the new value
    pub fn toggle_dark_mode(&mut self) -> WidgetResult<bool> {
        let next = Preferences {
            dark_mode: !self.current.dark_mode,
        };
        Ok(self.set(next)?.dark_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_dark_mode_defaults_on() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        assert!(PreferenceStore::mount(store).get().dark_mode);
    }

    #[test]
    fn test_toggle_persists() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut prefs = PreferenceStore::mount(Arc::clone(&store));

        assert!(!prefs.toggle_dark_mode().unwrap());
        assert!(!PreferenceStore::mount(store).get().dark_mode);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set("preferences:display", "maybe").unwrap();

        assert!(PreferenceStore::mount(store).get().dark_mode);
    }
}
