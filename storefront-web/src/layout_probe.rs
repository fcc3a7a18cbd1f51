//! [`LayoutProbe`] over the live page.
//!
//! Scroll and viewport are the window's; content height is the products
//! screen's. Rects are viewport-relative, as `getBoundingClientRect` reports.

use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use storefront_core::constants::{PRODUCT_CARD_CLASS, SCROLL_CONTAINER_ID};
use storefront_core::{ElementRect, LayoutProbe};

use crate::dom;

#[derive(Debug, Clone, Copy, Default)]
pub struct DomLayoutProbe;

impl LayoutProbe for DomLayoutProbe {
    fn scroll_position(&self) -> f64 {
        dom::page_scroll_top()
    }

    fn viewport_height(&self) -> f64 {
        dom::viewport_height()
    }

    fn content_height(&self) -> f64 {
        dom::document()
            .get_element_by_id(SCROLL_CONTAINER_ID)
            .map_or(0.0, |screen| f64::from(screen.scroll_height()))
    }

    fn element_rect(&self, element_id: &str) -> Option<ElementRect> {
        let rect = dom::document()
            .get_element_by_id(element_id)?
            .get_bounding_client_rect();
        Some(ElementRect {
            top: rect.top(),
            height: rect.height(),
        })
    }

    fn last_card_height(&self) -> Option<f64> {
        let cards = dom::document().get_elements_by_class_name(PRODUCT_CARD_CLASS);
        let last = cards.item(cards.length().checked_sub(1)?)?;
        let card = last.dyn_into::<HtmlElement>().ok()?;
        Some(f64::from(card.offset_height()))
    }
}
