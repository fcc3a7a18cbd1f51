//! Headless browsing session.
//!
//! Replays what the products page does around the category window without a
//! browser: render the mounted blocks, report their media, grow on scroll,
//! settle after renders and carry out the scroll and re-measure effects.
//! Each step is checked against the window invariants and violations are
//! collected instead of aborting the run.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use storefront_core::{
    Additions, AnchorNavigator, CartStore, Catalog, CatalogSource, LayoutProbe,
    LineItemSignature, MemoryNavigator, NavigationBridge, Product, SimulatedLayout, Storefront,
    StorefrontConfig, WindowEffect, WindowManager, calculate_effective_price,
};

const CATALOG_JSON: &str =
    include_str!("../../../storefront-web/static/assets/data/catalog.json");

pub const VIEWPORT_HEIGHT: f64 = 800.0;
pub const CARD_HEIGHT: f64 = 320.0;
const HEADING_HEIGHT: f64 = 48.0;
const MAX_HOST_ROUNDS: usize = 64;

/// Catalog shipped with the web app, parsed on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogSource for BundledCatalog {
    type Error = serde_json::Error;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::from_json(CATALOG_JSON)
    }
}

/// Shared, read-only inputs of every session.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub catalog: Catalog,
    pub config: StorefrontConfig,
}

impl TesterAssets {
    /// Bundled catalog with the bundled config.
    ///
    /// # Errors
    ///
    /// Fails when the bundled catalog does not parse.
    pub fn load_default() -> Result<Self> {
        Self::load_with_config(StorefrontConfig::load_from_static())
    }

    /// Bundled catalog with an explicit config.
    ///
    /// # Errors
    ///
    /// Fails when the bundled catalog does not parse.
    pub fn load_with_config(config: StorefrontConfig) -> Result<Self> {
        let storefront = Storefront::new(BundledCatalog, config);
        let catalog = storefront
            .load_catalog()
            .context("parsing bundled catalog")?;
        if catalog.categories.is_empty() {
            bail!("bundled catalog has no categories");
        }
        Ok(Self {
            catalog,
            config: storefront.config().clone(),
        })
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.catalog.categories.len()
    }

    /// Rendered height of a category block: heading plus one card per product.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn block_height(&self, category_id: &str) -> f64 {
        let cards = self
            .catalog
            .categories
            .iter()
            .find(|cat| cat.id == category_id)
            .map_or(0, |cat| cat.products.len());
        HEADING_HEIGHT + cards as f64 * CARD_HEIGHT
    }
}

/// When mounted blocks finish loading their media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadPolicy {
    /// Within the same render.
    Instant,
    /// Only when the session is told to finish them.
    Deferred,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionMetrics {
    pub renders: usize,
    pub growth_events: usize,
    pub jumps_accepted: usize,
    pub jumps_ignored: usize,
    pub scrolls_animated: usize,
    pub remeasures: usize,
    pub stale_remeasures: usize,
    pub cart_mutations: usize,
}

/// End-of-session snapshot handed to scenario expectations.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub compact_layout: bool,
    pub category_count: usize,
    pub opened_at: usize,
    pub initial_right_bound: usize,
    pub start_idx: usize,
    pub right_bound: usize,
    pub covers_end: bool,
    pub selected_idx: usize,
    pub active_category: Option<String>,
    pub anchor_history: Vec<String>,
    pub metrics: SessionMetrics,
    pub violations: Vec<String>,
    pub cart_cost: i64,
    pub cart_discount: i64,
    pub total_items: u32,
    pub expected_cart_cost: i64,
    pub expected_cart_discount: i64,
    pub expected_total_items: u32,
}

/// Independent bookkeeping of what the cart should hold.
#[derive(Debug, Clone, Default)]
struct CartLedger {
    lines: BTreeMap<String, LedgerLine>,
}

#[derive(Debug, Clone, Copy)]
struct LedgerLine {
    count: u32,
    regular_cents: i64,
    discounted_cents: i64,
}

impl CartLedger {
    fn set(&mut self, product: &Product, additions: &Additions, count: u32) {
        let key = LineItemSignature::new(product.id.clone(), additions.clone()).encode();
        if count == 0 {
            self.lines.remove(&key);
            return;
        }
        let extras: i64 = additions
            .iter()
            .map(|(id, qty)| product.addition_price(id).unwrap_or(0) * i64::from(*qty))
            .sum();
        let regular_cents = product.price_cents + extras;
        self.lines.insert(
            key,
            LedgerLine {
                count,
                regular_cents,
                discounted_cents: calculate_effective_price(regular_cents, product.discount_pct),
            },
        );
    }

    fn cost(&self) -> i64 {
        self.lines
            .values()
            .map(|line| i64::from(line.count) * line.discounted_cents)
            .sum()
    }

    fn discount(&self) -> i64 {
        self.lines
            .values()
            .map(|line| i64::from(line.count) * (line.discounted_cents - line.regular_cents))
            .sum()
    }

    fn items(&self) -> u32 {
        self.lines.values().map(|line| line.count).sum()
    }
}

pub struct BrowsingSession {
    assets: Arc<TesterAssets>,
    seed: u64,
    window: WindowManager,
    bridge: NavigationBridge<MemoryNavigator>,
    layout: SimulatedLayout,
    cart: CartStore,
    ledger: CartLedger,
    load_policy: LoadPolicy,
    mounted: BTreeSet<String>,
    loading: BTreeSet<String>,
    timers: Vec<u64>,
    opened_at: usize,
    initial_right_bound: usize,
    last_right_offset: usize,
    metrics: SessionMetrics,
    violations: Vec<String>,
}

impl BrowsingSession {
    /// Open the products page, optionally at a category anchor, and run the
    /// first render.
    ///
    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn open(
        assets: Arc<TesterAssets>,
        seed: u64,
        anchor: Option<&str>,
        load_policy: LoadPolicy,
    ) -> Result<Self> {
        let navigator = anchor.map_or_else(MemoryNavigator::new, MemoryNavigator::with_anchor);
        let bridge = NavigationBridge::new(navigator);
        let category_ids = assets.catalog.category_ids();
        let opened_at = bridge.initial_index(&category_ids);
        let window = WindowManager::new(category_ids, opened_at, assets.config.clone());
        let layout = SimulatedLayout::new(VIEWPORT_HEIGHT, CARD_HEIGHT)
            .with_lead_height(assets.config.header_height_px);

        let mut session = Self {
            last_right_offset: window.right_offset(),
            initial_right_bound: window.right_bound(),
            assets,
            seed,
            window,
            bridge,
            layout,
            cart: CartStore::new(),
            ledger: CartLedger::default(),
            load_policy,
            mounted: BTreeSet::new(),
            loading: BTreeSet::new(),
            timers: Vec::new(),
            opened_at,
            metrics: SessionMetrics::default(),
            violations: Vec::new(),
        };
        session.run_host_loop()?;
        Ok(session)
    }

    #[must_use]
    pub const fn window(&self) -> &WindowManager {
        &self.window
    }

    #[must_use]
    pub fn assets(&self) -> &TesterAssets {
        &self.assets
    }

    #[must_use]
    pub fn loading_ids(&self) -> Vec<String> {
        self.loading.iter().cloned().collect()
    }

    /// Scroll by `delta` pixels and let the page react.
    ///
    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn scroll_by(&mut self, delta: f64) -> Result<()> {
        let position = self.layout.scroll_position() + delta;
        self.layout.scroll_to(position);
        self.run_host_loop()
    }

    /// Scroll to the bottom of what is rendered and let the page react.
    ///
    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn scroll_to_bottom(&mut self) -> Result<()> {
        self.layout.scroll_to_bottom();
        self.run_host_loop()
    }

    /// Keep scrolling to the bottom until the window covers the catalog,
    /// finishing any media still loading. Returns the number of scrolls.
    ///
    /// # Errors
    ///
    /// Fails when the window stops growing before reaching the end.
    pub fn scroll_until_end(&mut self) -> Result<usize> {
        let limit = self.assets.category_count() * 2 + 2;
        for scrolls in 0..limit {
            if self.window.covers_end() {
                return Ok(scrolls);
            }
            if !self.loading.is_empty() {
                self.finish_all_loading()?;
            }
            self.scroll_to_bottom()?;
        }
        if self.window.covers_end() {
            return Ok(limit);
        }
        bail!(
            "window stuck at {}..={} of {} after {limit} scrolls",
            self.window.start_idx(),
            self.window.right_bound(),
            self.assets.category_count()
        )
    }

    /// Media of one mounted block finished loading.
    ///
    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn finish_loading(&mut self, category_id: &str) -> Result<bool> {
        if !self.loading.remove(category_id) {
            return Ok(false);
        }
        self.window.report_load_state(category_id, true);
        self.run_host_loop()?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn finish_all_loading(&mut self) -> Result<()> {
        self.report_all_loaded();
        self.run_host_loop()
    }

    /// Pick a category in the picker. Returns whether the jump was accepted.
    ///
    /// # Errors
    ///
    /// Fails when the host loop does not settle.
    pub fn select_category(&mut self, idx: usize) -> Result<bool> {
        let accepted = self.bridge.select_category(&mut self.window, idx);
        if !accepted {
            self.metrics.jumps_ignored += 1;
            return Ok(false);
        }

        self.metrics.jumps_accepted += 1;
        let selected = self.window.selected_id().map(str::to_string);
        if self.bridge.navigator().current_anchor() != selected {
            self.violation(format!(
                "anchor {:?} does not match selected category {selected:?}",
                self.bridge.navigator().current_anchor()
            ));
        }
        if idx > self.window.right_bound() {
            self.violation(format!(
                "jump to {idx} left the window at {}",
                self.window.right_bound()
            ));
        }
        self.last_right_offset = self.last_right_offset.max(self.window.right_offset());
        self.run_host_loop()?;
        self.check_landing();
        Ok(true)
    }

    /// Set the count of a product line with the given additions.
    ///
    /// # Errors
    ///
    /// Fails on unknown products and cart contract errors.
    pub fn set_count(&mut self, product_id: &str, additions: Additions, count: u32) -> Result<()> {
        let product = self
            .assets
            .catalog
            .find_product(product_id)
            .with_context(|| format!("unknown product {product_id}"))?
            .clone();
        let (_, setter, _) = self.cart.get_count(&product, additions.clone())?;
        setter.apply(&mut self.cart, count)?;
        self.ledger.set(&product, &additions, count);
        self.metrics.cart_mutations += 1;
        Ok(())
    }

    /// Remove the bare line of a product.
    ///
    /// # Errors
    ///
    /// Propagates cart contract errors.
    pub fn remove_bare(&mut self, product_id: &str) -> Result<()> {
        self.cart.remove(product_id)?;
        self.ledger
            .lines
            .remove(&LineItemSignature::bare(product_id).encode());
        self.metrics.cart_mutations += 1;
        Ok(())
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.ledger.lines.clear();
        self.metrics.cart_mutations += 1;
    }

    /// Category under the reading line, from the last offset measurement.
    #[must_use]
    pub fn active_category(&self) -> Option<String> {
        let reading_line =
            self.layout.scroll_position() + self.window.config().header_height_px;
        self.window
            .offsets()
            .active_category(self.window.category_ids(), reading_line)
            .map(str::to_string)
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            compact_layout: self.window.config().compact_layout,
            category_count: self.window.category_ids().len(),
            opened_at: self.opened_at,
            initial_right_bound: self.initial_right_bound,
            start_idx: self.window.start_idx(),
            right_bound: self.window.right_bound(),
            covers_end: self.window.covers_end(),
            selected_idx: self.window.selected_idx(),
            active_category: self.active_category(),
            anchor_history: self.bridge.navigator().history().to_vec(),
            metrics: self.metrics.clone(),
            violations: self.violations.clone(),
            cart_cost: self.cart.cart_cost(),
            cart_discount: self.cart.cart_discount(),
            total_items: self.cart.total_items(),
            expected_cart_cost: self.ledger.cost(),
            expected_cart_discount: self.ledger.discount(),
            expected_total_items: self.ledger.items(),
        }
    }

    /// Render, grow and settle until the page is quiet, then fire timers.
    fn run_host_loop(&mut self) -> Result<()> {
        for _ in 0..MAX_HOST_ROUNDS {
            self.render();
            self.check_window();
            if self.grow() {
                continue;
            }
            if !self.window.needs_settle() {
                self.fire_timers();
                return Ok(());
            }
            let effects = self.window.settle(&self.layout);
            if !self.apply_effects(effects) {
                self.fire_timers();
                return Ok(());
            }
        }
        bail!("host loop did not settle after {MAX_HOST_ROUNDS} rounds")
    }

    fn render(&mut self) {
        let visible = self.window.visible_ids().to_vec();
        self.layout.render(
            visible
                .iter()
                .map(|id| (id.clone(), self.assets.block_height(id))),
        );
        self.metrics.renders += 1;

        for id in visible {
            if self.mounted.insert(id.clone()) {
                self.window.report_load_state(&id, false);
                self.loading.insert(id);
            }
        }
        if self.load_policy == LoadPolicy::Instant {
            self.report_all_loaded();
        }
    }

    fn report_all_loaded(&mut self) {
        for id in std::mem::take(&mut self.loading) {
            self.window.report_load_state(&id, true);
        }
    }

    fn grow(&mut self) -> bool {
        let before = self.window.right_offset();
        let fully_loaded = self.window.is_fully_loaded();
        if !self.window.check_growth(&self.layout) {
            return false;
        }

        self.metrics.growth_events += 1;
        let step = self.window.right_offset() - before;
        if step != 1 {
            self.violation(format!("window grew by {step} categories in one check"));
        }
        if !fully_loaded {
            self.violation(format!(
                "window grew to {} while {:?} were loading",
                self.window.right_bound(),
                self.loading
            ));
        }
        true
    }

    /// Returns whether the page scrolled.
    fn apply_effects(&mut self, effects: Vec<WindowEffect>) -> bool {
        let mut scrolled = false;
        for effect in effects {
            match effect {
                WindowEffect::ScheduleRemeasure { revision, .. } => self.timers.push(revision),
                WindowEffect::ScrollTo { top, .. } => {
                    self.layout.scroll_to(top);
                    self.metrics.scrolls_animated += 1;
                    scrolled = true;
                }
            }
        }
        scrolled
    }

    fn fire_timers(&mut self) {
        for revision in std::mem::take(&mut self.timers) {
            if revision != self.window.revision() {
                self.metrics.stale_remeasures += 1;
            }
            self.window.remeasure_offsets(&self.layout);
            self.metrics.remeasures += 1;
        }
    }

    fn check_window(&mut self) {
        let start = self.window.start_idx();
        let expected_start = if self.window.config().compact_layout {
            0
        } else {
            self.opened_at
        };
        if start != expected_start {
            self.violation(format!("start_idx moved to {start} (opened at {expected_start})"));
        }

        let right_offset = self.window.right_offset();
        if right_offset < self.last_right_offset {
            self.violation(format!(
                "right_offset shrank from {} to {right_offset}",
                self.last_right_offset
            ));
        }
        self.last_right_offset = right_offset;

        let len = self.window.category_ids().len();
        if self.window.right_bound() >= len {
            self.violation(format!(
                "window bound {} past the {len} categories",
                self.window.right_bound()
            ));
        }
    }

    /// After a jump settles with everything loaded, the selected category
    /// must sit under the reading line. Jumps the page could not scroll far
    /// enough for are skipped.
    fn check_landing(&mut self) {
        if !self.window.is_fully_loaded() {
            return;
        }
        if self.window.pending_scroll() {
            self.violation(String::from("scroll stayed pending with every block loaded"));
            return;
        }
        let Some(target) = self.window.scroll_target(&self.layout) else {
            return;
        };
        if (self.layout.scroll_position() - target).abs() > 0.5 {
            return;
        }
        let selected = self.window.selected_id().map(str::to_string);
        let active = self.active_category();
        if active != selected {
            self.violation(format!(
                "landed on {active:?} after selecting {selected:?}"
            ));
        }
    }

    fn violation(&mut self, message: String) {
        log::warn!("seed {}: {message}", self.seed);
        self.violations.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> Arc<TesterAssets> {
        Arc::new(TesterAssets::load_with_config(StorefrontConfig::default()).unwrap())
    }

    #[test]
    fn bundled_assets_load() {
        let assets = assets();
        assert!(assets.category_count() > 1);
        let first = assets.catalog.categories[0].id.clone();
        assert!(assets.block_height(&first) > HEADING_HEIGHT);
        assert!((assets.block_height("missing") - HEADING_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn scrolling_mounts_the_whole_catalog_one_block_at_a_time() {
        let assets = assets();
        let count = assets.category_count();
        let mut session = BrowsingSession::open(assets, 1, None, LoadPolicy::Instant).unwrap();
        session.scroll_until_end().unwrap();

        let summary = session.summary();
        assert!(summary.covers_end);
        assert_eq!(summary.start_idx, 0);
        assert_eq!(summary.right_bound, count - 1);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
        assert!(summary.metrics.remeasures > 0);
    }

    #[test]
    fn deferred_media_blocks_growth() {
        let mut session =
            BrowsingSession::open(assets(), 2, None, LoadPolicy::Deferred).unwrap();
        let bound = session.window().right_bound();
        session.scroll_to_bottom().unwrap();
        assert_eq!(session.window().right_bound(), bound);
        assert_eq!(session.loading_ids().len(), 1);

        let first = session.loading_ids()[0].clone();
        assert!(session.finish_loading(&first).unwrap());
        assert!(!session.finish_loading(&first).unwrap());
        assert!(session.summary().violations.is_empty());
    }

    #[test]
    fn anchored_session_starts_at_anchor() {
        let assets = assets();
        let anchor = assets.catalog.categories[2].id.clone();
        let mut session =
            BrowsingSession::open(assets, 3, Some(&format!("#{anchor}")), LoadPolicy::Instant)
                .unwrap();
        assert_eq!(session.window().start_idx(), 2);
        assert!(!session.select_category(0).unwrap());
        assert_eq!(session.summary().metrics.jumps_ignored, 1);
    }

    #[test]
    fn jump_lands_on_selected_category() {
        let mut session = BrowsingSession::open(assets(), 4, None, LoadPolicy::Instant).unwrap();
        assert!(session.select_category(1).unwrap());
        let summary = session.summary();
        assert_eq!(summary.selected_idx, 1);
        assert_eq!(summary.anchor_history.len(), 1);
        assert!(summary.violations.is_empty(), "{:?}", summary.violations);
    }

    #[test]
    fn cart_matches_ledger() {
        let mut session = BrowsingSession::open(assets(), 5, None, LoadPolicy::Instant).unwrap();
        session
            .set_count("margherita", Additions::from([(String::from("cheese"), 2)]), 2)
            .unwrap();
        session.set_count("cola", Additions::new(), 3).unwrap();
        session.remove_bare("cola").unwrap();

        let summary = session.summary();
        assert_eq!(summary.cart_cost, summary.expected_cart_cost);
        assert_eq!(summary.cart_cost, 2 * (890 + 2 * 150));
        assert_eq!(summary.total_items, 2);

        assert!(session.set_count("ghost", Additions::new(), 1).is_err());
        session.clear_cart();
        assert_eq!(session.summary().expected_total_items, 0);
    }
}
