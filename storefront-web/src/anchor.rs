//! [`AnchorNavigator`] backed by the router's browser history.

use storefront_core::{AnchorNavigator, products_anchor_url};
use yew_router::history::{BrowserHistory, History};

/// Writes `{products_path}#{id}` as a new history entry so the selected
/// category survives reloads and shared links.
///
/// `BrowserHistory::new` hands out the per-thread instance a mounted
/// `BrowserRouter` listens to, so the router sees every anchor change.
#[derive(Clone)]
pub struct BrowserAnchorNavigator {
    products_path: String,
    history: BrowserHistory,
}

impl BrowserAnchorNavigator {
    #[must_use]
    pub fn new(products_path: impl Into<String>) -> Self {
        Self {
            products_path: products_path.into(),
            history: BrowserHistory::new(),
        }
    }
}

impl AnchorNavigator for BrowserAnchorNavigator {
    fn current_anchor(&self) -> Option<String> {
        Some(self.history.location().hash().to_string()).filter(|hash| !hash.is_empty())
    }

    fn set_anchor(&mut self, anchor: &str) {
        let url = products_anchor_url(&crate::paths::asset_path(&self.products_path), anchor);
        log::debug!("anchor -> {url}");
        self.history.push(url);
    }
}
