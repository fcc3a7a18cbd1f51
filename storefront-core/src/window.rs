//! Category window manager.
//!
//! Decides which categories of the ordered catalog are mounted. The window is
//! `[start_idx, start_idx + right_offset]`; `start_idx` is fixed when the page
//! mounts and `right_offset` only ever grows. Dropping categories from the top
//! would shift the scroll position under the user, so the window never
//! contracts.
//!
//! The manager is driven by the host page:
//! - scroll events and renders call [`WindowManager::check_growth`];
//! - category blocks report through [`WindowManager::report_load_state`];
//! - the picker calls [`WindowManager::jump_to`] (see [`crate::navigation`]);
//! - after each render where [`WindowManager::needs_settle`] holds, the host
//!   calls [`WindowManager::settle`] and carries out the returned
//!   [`WindowEffect`]s (timers and scroll animation).

use std::collections::BTreeMap;
use std::ops::Range;

use crate::config::StorefrontConfig;
use crate::layout::{LayoutProbe, category_block_id};
use crate::load_tracker::LoadTracker;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowState {
    pub start_idx: usize,
    pub right_offset: usize,
}

impl WindowState {
    #[must_use]
    pub const fn right_bound(&self) -> usize {
        self.start_idx + self.right_offset
    }
}

/// Side effects the host must carry out after [`WindowManager::settle`].
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEffect {
    /// Call [`WindowManager::remeasure_offsets`] once `delay_ms` has elapsed.
    /// Older timers are not cancelled; the last measurement wins.
    ScheduleRemeasure { delay_ms: u32, revision: u64 },
    /// Animate the page scroll to `top`.
    ScrollTo {
        top: f64,
        duration_ms: u32,
        easing: String,
    },
}

/// Vertical offset of each measured category block within the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryOffsetMap(BTreeMap<String, f64>);

impl CategoryOffsetMap {
    #[must_use]
    pub fn get(&self, category_id: &str) -> Option<f64> {
        self.0.get(category_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, offset)| (id.as_str(), *offset))
    }

    /// Category whose block starts at or above `reading_line`, walking in
    /// catalog order. Falls back to the first measured category.
    #[must_use]
    pub fn active_category<'a>(&self, order: &'a [String], reading_line: f64) -> Option<&'a str> {
        let mut first = None;
        let mut active = None;
        for id in order {
            let Some(offset) = self.get(id) else {
                continue;
            };
            first.get_or_insert(id.as_str());
            if offset <= reading_line {
                active = Some(id.as_str());
            }
        }
        active.or(first)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowManager {
    category_ids: Vec<String>,
    state: WindowState,
    tracker: LoadTracker,
    revision: u64,
    settled_revision: Option<u64>,
    pending_scroll: bool,
    selected_idx: usize,
    offsets: CategoryOffsetMap,
    config: StorefrontConfig,
}

impl WindowManager {
    /// Build the initial window around the selected category.
    ///
    /// An out-of-range `selected_idx` falls back to the first category.
    #[must_use]
    pub fn new(category_ids: Vec<String>, selected_idx: usize, config: StorefrontConfig) -> Self {
        let len = category_ids.len();
        let selected_idx = if selected_idx < len { selected_idx } else { 0 };
        let last_idx = len.saturating_sub(1);

        let start_idx = if config.compact_layout { 0 } else { selected_idx };
        let right_offset = if !config.dynamic_growth {
            last_idx
        } else if config.compact_layout {
            selected_idx
        } else {
            0
        };
        let right_offset = right_offset.min(last_idx.saturating_sub(start_idx));

        log::debug!(
            "category window mounted at {start_idx}+{right_offset} of {len} (selected {selected_idx})"
        );

        Self {
            category_ids,
            state: WindowState {
                start_idx,
                right_offset,
            },
            tracker: LoadTracker::new(),
            revision: 0,
            settled_revision: None,
            pending_scroll: false,
            selected_idx,
            offsets: CategoryOffsetMap::default(),
            config,
        }
    }

    #[must_use]
    pub const fn state(&self) -> WindowState {
        self.state
    }

    #[must_use]
    pub const fn start_idx(&self) -> usize {
        self.state.start_idx
    }

    #[must_use]
    pub const fn right_offset(&self) -> usize {
        self.state.right_offset
    }

    /// Last mounted index.
    #[must_use]
    pub const fn right_bound(&self) -> usize {
        self.state.right_bound()
    }

    /// Mounted indices; empty when the catalog has no categories.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.right_bound() + 1).min(self.category_ids.len());
        self.state.start_idx.min(end)..end
    }

    #[must_use]
    pub fn visible_ids(&self) -> &[String] {
        &self.category_ids[self.visible_range()]
    }

    /// The window reaches the end of the catalog.
    #[must_use]
    pub fn covers_end(&self) -> bool {
        self.right_bound() + 1 >= self.category_ids.len()
    }

    #[must_use]
    pub fn category_ids(&self) -> &[String] {
        &self.category_ids
    }

    #[must_use]
    pub const fn selected_idx(&self) -> usize {
        self.selected_idx
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.category_ids.get(self.selected_idx).map(String::as_str)
    }

    /// Advances on window growth, jumps and categories finishing their load.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn pending_scroll(&self) -> bool {
        self.pending_scroll
    }

    #[must_use]
    pub const fn offsets(&self) -> &CategoryOffsetMap {
        &self.offsets
    }

    #[must_use]
    pub const fn tracker(&self) -> &LoadTracker {
        &self.tracker
    }

    #[must_use]
    pub fn is_fully_loaded(&self) -> bool {
        self.tracker.is_fully_loaded()
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Forward a category block's load state to the session tracker.
    /// Returns `true` when the revision advanced.
    pub fn report_load_state(&mut self, category_id: &str, is_loaded: bool) -> bool {
        if self.tracker.report(category_id, is_loaded) {
            self.bump_revision();
            true
        } else {
            false
        }
    }

    /// Scroll depth past which the next category is mounted: the content
    /// height minus a fraction of the last card. Zero when no card is rendered.
    #[must_use]
    pub fn load_boundary(&self, probe: &impl LayoutProbe) -> f64 {
        probe.last_card_height().map_or(0.0, |card_height| {
            probe.content_height() - card_height * self.config.load_boundary_card_fraction
        })
    }

    /// Mount one more category if the user has scrolled close to the bottom.
    ///
    /// Never grows while any reported category is still loading: blocks of
    /// unknown height make the boundary meaningless. Grows by exactly one.
    pub fn check_growth(&mut self, probe: &impl LayoutProbe) -> bool {
        if !self.tracker.is_fully_loaded() || self.covers_end() {
            return false;
        }

        let boundary = self.load_boundary(probe);
        if probe.scroll_position() + probe.viewport_height() <= boundary {
            return false;
        }

        self.state.right_offset += 1;
        self.bump_revision();
        log::debug!(
            "category window grew to {} (boundary {boundary:.1})",
            self.right_bound()
        );
        true
    }

    /// Select a category explicitly, extending the window to cover it in one
    /// step and marking a scroll to it as pending.
    ///
    /// Indices below `start_idx` can never be mounted and are ignored, as are
    /// indices past the catalog. Returns whether the window was extended.
    pub fn jump_to(&mut self, idx: usize) -> bool {
        if idx >= self.category_ids.len() || idx < self.state.start_idx {
            log::debug!("ignoring jump to unmountable category {idx}");
            return false;
        }

        let extended = idx > self.right_bound();
        if extended {
            self.state.right_offset = idx - self.state.start_idx;
        }
        self.selected_idx = idx;
        self.pending_scroll = true;
        self.bump_revision();
        log::debug!(
            "jump to category {idx} (window {}..={})",
            self.state.start_idx,
            self.right_bound()
        );
        extended
    }

    /// The revision moved since the last [`WindowManager::settle`].
    #[must_use]
    pub fn needs_settle(&self) -> bool {
        self.settled_revision != Some(self.revision)
    }

    /// Post-render step. Once everything mounted has loaded, schedules an
    /// offset re-measurement and, if a jump is pending and its block is on the
    /// page, the scroll animation to it.
    pub fn settle(&mut self, probe: &impl LayoutProbe) -> Vec<WindowEffect> {
        self.settled_revision = Some(self.revision);
        let mut effects = Vec::new();
        if !self.tracker.is_fully_loaded() {
            return effects;
        }

        effects.push(WindowEffect::ScheduleRemeasure {
            delay_ms: self.config.settle_delay_ms,
            revision: self.revision,
        });

        if self.pending_scroll {
            if let Some(top) = self.scroll_target(probe) {
                self.pending_scroll = false;
                effects.push(WindowEffect::ScrollTo {
                    top,
                    duration_ms: self.config.scroll_duration_ms,
                    easing: self.config.scroll_easing.clone(),
                });
            } else {
                log::debug!("selected category block not rendered yet; scroll stays pending");
            }
        }
        effects
    }

    /// Page offset to scroll to so the selected category sits under the header.
    #[must_use]
    pub fn scroll_target(&self, probe: &impl LayoutProbe) -> Option<f64> {
        let id = self.selected_id()?;
        let rect = probe.element_rect(&category_block_id(id))?;
        Some(
            probe.scroll_position() + rect.top - self.config.header_height_px
                + self.config.scroll_correction_px
                + self.config.heading_margin_px,
        )
    }

    /// Measure every known category block that is on the page. Blocks that are
    /// not rendered keep their previous offset.
    pub fn remeasure_offsets(&mut self, probe: &impl LayoutProbe) -> &CategoryOffsetMap {
        let scroll = probe.scroll_position();
        for id in self.tracker.known_ids() {
            if let Some(rect) = probe.element_rect(&category_block_id(id)) {
                self.offsets.0.insert(id.to_string(), scroll + rect.top);
            }
        }
        log::debug!("re-measured {} category offsets", self.offsets.len());
        &self.offsets
    }

    fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SimulatedLayout;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn config(dynamic_growth: bool, compact_layout: bool) -> StorefrontConfig {
        StorefrontConfig {
            dynamic_growth,
            compact_layout,
            ..StorefrontConfig::default()
        }
    }

    fn rendered(manager: &WindowManager, block_height: f64) -> SimulatedLayout {
        let mut layout = SimulatedLayout::new(600.0, 200.0);
        layout.render(
            manager
                .visible_ids()
                .iter()
                .map(|id| (id.clone(), block_height)),
        );
        layout
    }

    #[test]
    fn initial_window_follows_layout_switches() {
        let cats = ids(&["a", "b", "c", "d", "e"]);
        let cases = [
            ((true, false), (2, 0)),
            ((true, true), (0, 2)),
            ((false, false), (2, 2)),
            ((false, true), (0, 4)),
        ];
        for ((dynamic, compact), (start, offset)) in cases {
            let manager = WindowManager::new(cats.clone(), 2, config(dynamic, compact));
            assert_eq!(
                manager.state(),
                WindowState {
                    start_idx: start,
                    right_offset: offset
                },
                "dynamic={dynamic} compact={compact}"
            );
            assert!(manager.right_bound() < cats.len());
        }
    }

    #[test]
    fn out_of_range_selection_falls_back_to_first() {
        let manager = WindowManager::new(ids(&["a", "b"]), 9, config(true, false));
        assert_eq!(manager.start_idx(), 0);
        assert_eq!(manager.selected_id(), Some("a"));
    }

    #[test]
    fn empty_catalog_has_empty_window() {
        let mut manager = WindowManager::new(Vec::new(), 0, config(true, false));
        assert!(manager.visible_ids().is_empty());
        assert!(manager.covers_end());
        let layout = SimulatedLayout::new(600.0, 200.0);
        assert!(!manager.check_growth(&layout));
        assert!(!manager.jump_to(0));
    }

    #[test]
    fn growth_waits_for_loading_categories() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 0, config(true, false));
        manager.report_load_state("a", false);
        let mut layout = rendered(&manager, 300.0);
        layout.scroll_to_bottom();
        assert!(!manager.check_growth(&layout));
        assert_eq!(manager.right_offset(), 0);

        manager.report_load_state("a", true);
        assert!(manager.check_growth(&layout));
        assert_eq!(manager.right_offset(), 1);
    }

    #[test]
    fn growth_needs_scroll_past_boundary() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 0, config(true, false));
        manager.report_load_state("a", true);
        let mut layout = rendered(&manager, 2_000.0);
        // content 2000, card 200 -> boundary 1900; 0 + 600 is short of it
        assert!(!manager.check_growth(&layout));
        layout.scroll_to(1_299.0);
        assert!(!manager.check_growth(&layout));
        layout.scroll_to(1_301.0);
        assert!(manager.check_growth(&layout));
    }

    #[test]
    fn missing_cards_mean_zero_boundary() {
        let mut manager = WindowManager::new(ids(&["a", "b"]), 0, config(true, false));
        let layout = SimulatedLayout::new(600.0, 200.0);
        assert!(manager.load_boundary(&layout).abs() < f64::EPSILON);
        assert!(manager.check_growth(&layout));
        assert!(manager.covers_end());
        assert!(!manager.check_growth(&layout));
    }

    #[test]
    fn jump_extends_in_one_step_and_marks_scroll() {
        let mut manager =
            WindowManager::new(ids(&["a", "b", "c", "d", "e"]), 0, config(true, true));
        let before = manager.revision();
        assert!(manager.jump_to(4));
        assert_eq!(manager.right_offset(), 4);
        assert!(manager.pending_scroll());
        assert_eq!(manager.revision(), before + 1);

        // Already covered: no extension, still pending and bumped.
        assert!(!manager.jump_to(1));
        assert_eq!(manager.right_offset(), 4);
        assert_eq!(manager.selected_id(), Some("b"));
        assert_eq!(manager.revision(), before + 2);
    }

    #[test]
    fn jump_above_start_is_ignored() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 2, config(true, false));
        let revision = manager.revision();
        assert!(!manager.jump_to(0));
        assert!(!manager.pending_scroll());
        assert_eq!(manager.revision(), revision);
        assert!(!manager.jump_to(7));
    }

    #[test]
    fn settle_schedules_remeasure_and_pending_scroll() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 0, config(true, true));
        manager.jump_to(2);
        let layout = rendered(&manager, 500.0);
        for id in ["a", "b", "c"] {
            manager.report_load_state(id, true);
        }
        assert!(manager.needs_settle());

        let effects = manager.settle(&layout);
        assert!(!manager.needs_settle());
        assert!(!manager.pending_scroll());
        assert_eq!(effects.len(), 2);
        assert!(matches!(
            effects[0],
            WindowEffect::ScheduleRemeasure { delay_ms: 300, .. }
        ));
        match &effects[1] {
            WindowEffect::ScrollTo {
                top, duration_ms, ..
            } => {
                assert!((top - 1_004.0).abs() < f64::EPSILON);
                assert_eq!(*duration_ms, 800);
            }
            other => panic!("expected scroll, got {other:?}"),
        }
    }

    #[test]
    fn settle_is_quiet_while_loading() {
        let mut manager = WindowManager::new(ids(&["a", "b"]), 0, config(true, true));
        manager.jump_to(1);
        manager.report_load_state("b", false);
        let layout = rendered(&manager, 500.0);
        assert!(manager.settle(&layout).is_empty());
        assert!(manager.pending_scroll());
    }

    #[test]
    fn scroll_stays_pending_until_block_renders() {
        let mut manager = WindowManager::new(ids(&["a", "b"]), 0, config(true, true));
        manager.jump_to(1);
        let layout = SimulatedLayout::new(600.0, 200.0);
        let effects = manager.settle(&layout);
        assert_eq!(effects.len(), 1);
        assert!(manager.pending_scroll());
    }

    #[test]
    fn remeasure_keeps_offsets_of_unrendered_blocks() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 0, config(false, false));
        for id in ["a", "b", "c"] {
            manager.report_load_state(id, true);
        }
        let mut layout = rendered(&manager, 400.0);
        layout.scroll_to(100.0);
        let offsets = manager.remeasure_offsets(&layout).clone();
        assert_eq!(offsets.get("a"), Some(0.0));
        assert_eq!(offsets.get("b"), Some(400.0));
        assert_eq!(offsets.get("c"), Some(800.0));

        layout.render([("a", 400.0)]);
        let offsets = manager.remeasure_offsets(&layout);
        assert_eq!(offsets.get("c"), Some(800.0));
    }

    #[test]
    fn active_category_tracks_reading_line() {
        let mut manager = WindowManager::new(ids(&["a", "b", "c"]), 0, config(false, false));
        for id in ["a", "b", "c"] {
            manager.report_load_state(id, true);
        }
        let layout = rendered(&manager, 400.0);
        manager.remeasure_offsets(&layout);
        let order = manager.category_ids().to_vec();
        let offsets = manager.offsets();
        assert_eq!(offsets.active_category(&order, 0.0), Some("a"));
        assert_eq!(offsets.active_category(&order, 450.0), Some("b"));
        assert_eq!(offsets.active_category(&order, 5_000.0), Some("c"));
        assert_eq!(CategoryOffsetMap::default().active_category(&order, 0.0), None);
    }
}
