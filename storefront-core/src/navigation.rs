//! Bridge between the category picker, the window manager and the URL anchor.
//!
//! The anchor (`#category-id`) makes a category deep-linkable: it picks the
//! initial window on mount and is rewritten whenever the user selects a
//! category from the picker.

use crate::window::WindowManager;

/// Host-side URL fragment access.
pub trait AnchorNavigator {
    /// Current fragment, with or without the leading `#`.
    fn current_anchor(&self) -> Option<String>;
    fn set_anchor(&mut self, anchor: &str);
}

/// Index of the category named by `anchor`, or `0` when the anchor is absent
/// or names no known category.
#[must_use]
pub fn initial_category_index(category_ids: &[String], anchor: Option<&str>) -> usize {
    let Some(anchor) = anchor else {
        return 0;
    };
    let id = anchor.strip_prefix('#').unwrap_or(anchor);
    if id.is_empty() {
        return 0;
    }
    category_ids.iter().position(|known| known == id).unwrap_or(0)
}

#[must_use]
pub fn products_anchor_url(products_path: &str, category_id: &str) -> String {
    format!("{products_path}#{category_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationBridge<N> {
    navigator: N,
}

impl<N: AnchorNavigator> NavigationBridge<N> {
    #[must_use]
    pub const fn new(navigator: N) -> Self {
        Self { navigator }
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_inner(self) -> N {
        self.navigator
    }

    /// Window index the page should open on.
    #[must_use]
    pub fn initial_index(&self, category_ids: &[String]) -> usize {
        initial_category_index(category_ids, self.navigator.current_anchor().as_deref())
    }

    /// Jump the window to category `idx` and publish its id as the anchor.
    ///
    /// Returns `false` and leaves everything untouched when `idx` is not a
    /// category the window can mount.
    pub fn select_category(&mut self, window: &mut WindowManager, idx: usize) -> bool {
        let Some(category_id) = window.category_ids().get(idx).cloned() else {
            log::debug!("category picker index {idx} out of range");
            return false;
        };
        if idx < window.start_idx() {
            log::debug!("category {category_id} sits above the mounted window");
            return false;
        }

        window.jump_to(idx);
        self.navigator.set_anchor(&category_id);
        true
    }
}

/// In-memory navigator recording every anchor it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNavigator {
    anchor: Option<String>,
    history: Vec<String>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_anchor(anchor: impl Into<String>) -> Self {
        Self {
            anchor: Some(anchor.into()),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl AnchorNavigator for MemoryNavigator {
    fn current_anchor(&self) -> Option<String> {
        self.anchor.clone()
    }

    fn set_anchor(&mut self, anchor: &str) {
        self.anchor = Some(anchor.to_string());
        self.history.push(anchor.to_string());
    }
}
