#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod anchor;
pub mod app;
pub mod cart_context;
pub mod components;
pub mod dom;
pub mod easing;
pub mod format;
pub mod layout_probe;
pub mod pages;
pub mod paths;
pub mod router;
pub mod storefront;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    yew::Renderer::<app::App>::new().render();
}
