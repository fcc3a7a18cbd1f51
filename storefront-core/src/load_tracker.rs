//! Per-session record of which categories have finished loading.
//!
//! Only categories that have mounted ever report, so "fully loaded" speaks
//! about the current window, not the whole catalog.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTracker {
    states: BTreeMap<String, bool>,
    revision: u64,
}

impl LoadTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a category's load state.
    ///
    /// Returns `true` when the report advanced the revision, i.e. the category
    /// transitioned to loaded. Repeated reports of the same state are ignored,
    /// and an unknown category reporting "not loaded" only creates its entry.
    pub fn report(&mut self, category_id: &str, is_loaded: bool) -> bool {
        let previous = self.states.get(category_id).copied().unwrap_or(false);
        let known = self.states.contains_key(category_id);
        if known && previous == is_loaded {
            return false;
        }

        self.states.insert(category_id.to_string(), is_loaded);
        if is_loaded && !previous {
            self.revision += 1;
            log::debug!(
                "category {category_id} loaded (revision {})",
                self.revision
            );
            return true;
        }
        false
    }

    /// Every category that ever reported is currently loaded. Vacuously true.
    #[must_use]
    pub fn is_fully_loaded(&self) -> bool {
        self.states.values().all(|loaded| *loaded)
    }

    #[must_use]
    pub fn is_loaded(&self, category_id: &str) -> bool {
        self.states.get(category_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn known_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}
