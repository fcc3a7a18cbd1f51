//! Centralized tuning constants for the storefront catalog window and cart.
//!
//! Defaults here back the serde defaults in [`crate::config::StorefrontConfig`];
//! deployments override them through the static config asset rather than by
//! editing code.

// Window growth -------------------------------------------------------------
/// Fraction of the last product card that must still be below the fold before
/// the next category is mounted. Tuned by hand, not derived.
pub const DEFAULT_LOAD_BOUNDARY_CARD_FRACTION: f64 = 0.5;

// Layout settle -------------------------------------------------------------
/// Screen transition duration; offsets are not trusted until it has elapsed.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 300;

// Scroll-to-category --------------------------------------------------------
/// Without this nudge mobile clients do not switch to the target category.
pub const DEFAULT_SCROLL_CORRECTION_PX: f64 = 4.0;
pub const DEFAULT_SCROLL_DURATION_MS: u32 = 800;
pub const DEFAULT_SCROLL_EASING: &str = "easeInOutQuart";

// DOM contract --------------------------------------------------------------
pub const CATEGORY_BLOCK_PREFIX: &str = "cat-prods-";
pub const PRODUCT_CARD_CLASS: &str = "prod-card";
pub const SCROLL_CONTAINER_ID: &str = "prods-screen";
/// Leading block rendered above the picker in compact layout.
pub const ANON_CATEGORY_ID: &str = "anon-cat-id";

// Routing -------------------------------------------------------------------
pub const DEFAULT_PRODUCTS_PATH: &str = "/wa/products";
