//! Layout measurement seam between the window manager and the host page
use crate::constants::CATEGORY_BLOCK_PREFIX;

/// Element bounds relative to the viewport, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementRect {
    pub top: f64,
    pub height: f64,
}

/// Read-only view of the scroll container the catalog is rendered in.
///
/// Implementations must tolerate partially rendered pages: missing elements
/// are reported as `None`, never as an error.
pub trait LayoutProbe {
    /// Vertical scroll offset of the page.
    fn scroll_position(&self) -> f64;
    fn viewport_height(&self) -> f64;
    /// Full scrollable height of the catalog container.
    fn content_height(&self) -> f64;
    fn element_rect(&self, element_id: &str) -> Option<ElementRect>;
    /// Height of the last rendered product card, if any card is on the page.
    fn last_card_height(&self) -> Option<f64>;
}

/// DOM id of a category's product block.
#[must_use]
pub fn category_block_id(category_id: &str) -> String {
    format!("{CATEGORY_BLOCK_PREFIX}{category_id}")
}

/// Deterministic stand-in for the browser layout: a stack of category blocks
/// of known height below a fixed lead area.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedLayout {
    scroll_position: f64,
    viewport_height: f64,
    lead_height: f64,
    card_height: f64,
    blocks: Vec<(String, f64)>,
}

impl SimulatedLayout {
    #[must_use]
    pub const fn new(viewport_height: f64, card_height: f64) -> Self {
        Self {
            scroll_position: 0.0,
            viewport_height,
            lead_height: 0.0,
            card_height,
            blocks: Vec::new(),
        }
    }

    /// Space above the first category block (headers, lead block).
    #[must_use]
    pub const fn with_lead_height(mut self, lead_height: f64) -> Self {
        self.lead_height = lead_height;
        self
    }

    /// Replace the rendered blocks, in window order.
    pub fn render<I, S>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.blocks = blocks
            .into_iter()
            .map(|(id, height)| (id.into(), height))
            .collect();
        self.scroll_to(self.scroll_position);
    }

    /// Scroll, clamped to the scrollable range.
    pub fn scroll_to(&mut self, position: f64) {
        let max = (self.content_height() - self.viewport_height).max(0.0);
        self.scroll_position = position.clamp(0.0, max);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_to(f64::MAX);
    }

    /// Document offset of a category block.
    #[must_use]
    pub fn block_top(&self, category_id: &str) -> Option<f64> {
        let mut top = self.lead_height;
        for (id, height) in &self.blocks {
            if id == category_id {
                return Some(top);
            }
            top += height;
        }
        None
    }
}

impl LayoutProbe for SimulatedLayout {
    fn scroll_position(&self) -> f64 {
        self.scroll_position
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn content_height(&self) -> f64 {
        self.lead_height + self.blocks.iter().map(|(_, height)| height).sum::<f64>()
    }

    fn element_rect(&self, element_id: &str) -> Option<ElementRect> {
        let category_id = element_id.strip_prefix(CATEGORY_BLOCK_PREFIX)?;
        let top = self.block_top(category_id)?;
        let height = self
            .blocks
            .iter()
            .find(|(id, _)| id == category_id)
            .map_or(0.0, |(_, height)| *height);
        Some(ElementRect {
            top: top - self.scroll_position,
            height,
        })
    }

    fn last_card_height(&self) -> Option<f64> {
        (!self.blocks.is_empty()).then_some(self.card_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_ids_use_shared_prefix() {
        assert_eq!(category_block_id("drinks"), "cat-prods-drinks");
    }

    #[test]
    fn simulated_rects_are_viewport_relative() {
        let mut layout = SimulatedLayout::new(500.0, 100.0).with_lead_height(50.0);
        layout.render([("a", 400.0), ("b", 600.0)]);
        assert!((layout.content_height() - 1_050.0).abs() < f64::EPSILON);

        layout.scroll_to(200.0);
        let rect = layout.element_rect(&category_block_id("b")).unwrap();
        assert!((rect.top - 250.0).abs() < f64::EPSILON);
        assert!((rect.height - 600.0).abs() < f64::EPSILON);
        assert!(layout.element_rect("cat-prods-zzz").is_none());
        assert!(layout.element_rect("b").is_none());
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut layout = SimulatedLayout::new(500.0, 100.0);
        assert_eq!(layout.last_card_height(), None);
        layout.render([("a", 800.0)]);
        layout.scroll_to_bottom();
        assert!((layout.scroll_position() - 300.0).abs() < f64::EPSILON);
        layout.scroll_to(-10.0);
        assert!(layout.scroll_position().abs() < f64::EPSILON);
        assert_eq!(layout.last_card_height(), Some(100.0));
    }
}
