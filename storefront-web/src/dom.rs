use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Storage, Window};

use crate::easing::Easing;

/// Retrieve the global `window` object.
///
/// # Panics
/// Panics if executed outside of a browser context where `window` is unavailable.
#[must_use]
pub fn window() -> Window {
    web_sys::window().expect("`window` should be available in web context")
}

/// Retrieve the document object for DOM interactions.
///
/// # Panics
/// Panics when the document cannot be accessed from the current browser window.
#[must_use]
pub fn document() -> Document {
    window()
        .document()
        .expect("`document` should exist in browser context")
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Run `callback` once after `delay_ms`. The timer is never cancelled.
///
/// # Errors
/// Returns an error if the timer cannot be scheduled.
pub fn set_timeout(delay_ms: u32, callback: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let closure = Closure::once(callback);
    let handle = window().set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    )?;
    closure.forget();
    Ok(handle)
}

/// Current vertical page scroll.
#[must_use]
pub fn page_scroll_top() -> f64 {
    window().page_y_offset().unwrap_or(0.0)
}

/// Window inner height in pixels.
#[must_use]
pub fn viewport_height() -> f64 {
    window()
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Animate the page scroll to `target` over `duration_ms`, one step per
/// animation frame.
///
/// # Errors
/// Returns an error if the first animation frame cannot be requested.
pub fn animate_scroll_to(target: f64, duration_ms: u32, easing: Easing) -> Result<(), JsValue> {
    let win = window();
    let from = page_scroll_top();
    let distance = target - from;
    if duration_ms == 0 || distance.abs() < 1.0 {
        win.scroll_to_with_x_and_y(0.0, target);
        return Ok(());
    }

    let duration = f64::from(duration_ms);
    let started_at = Rc::new(RefCell::new(None::<f64>));
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let next_frame = frame.clone();

    *frame.borrow_mut() = Some(Closure::new(move |now: f64| {
        let start = *started_at.borrow_mut().get_or_insert(now);
        let progress = ((now - start) / duration).clamp(0.0, 1.0);
        window().scroll_to_with_x_and_y(0.0, from + distance * easing.apply(progress));

        if progress >= 1.0 {
            let _ = next_frame.borrow_mut().take();
            return;
        }
        if let Some(callback) = next_frame.borrow().as_ref()
            && let Err(err) = window().request_animation_frame(callback.as_ref().unchecked_ref())
        {
            console_error(&js_error_message(&err));
        }
    }));

    let first = frame.borrow();
    if let Some(callback) = first.as_ref() {
        win.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
