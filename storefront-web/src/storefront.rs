//! Web-specific storefront wiring
//!
//! Browser implementations of the storefront-core collaborator traits and
//! re-exports of the core types.

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// Re-export all types from storefront-core
pub use storefront_core::*;

const CATALOG_JSON: &str = include_str!("../static/assets/data/catalog.json");
const CART_STORAGE_KEY: &str = "storefront.cart";

static CONFIG: Lazy<StorefrontConfig> = Lazy::new(StorefrontConfig::load_from_static);

/// Config parsed once from the bundled asset.
#[must_use]
pub fn bundled_config() -> StorefrontConfig {
    CONFIG.clone()
}

/// Catalog bundled with the app; fetching from a backend is out of scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddedCatalog;

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog has no categories")]
    Empty,
}

impl CatalogSource for EmbeddedCatalog {
    type Error = CatalogLoadError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        let catalog = Catalog::from_json(CATALOG_JSON)?;
        if catalog.categories.is_empty() {
            return Err(CatalogLoadError::Empty);
        }
        Ok(catalog)
    }
}

/// Cart persistence in `localStorage` under a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorageCartCache {
    key: String,
}

impl Default for LocalStorageCartCache {
    fn default() -> Self {
        Self::with_key(CART_STORAGE_KEY)
    }
}

impl LocalStorageCartCache {
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartCacheError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("localStorage is not available outside the browser")]
    Unavailable,
}

/// Shape written to storage: `{"cart": {...}}`.
#[derive(Debug, Serialize, Deserialize)]
struct CachedCart {
    cart: Cart,
}

/// Serialize a cart snapshot for storage.
///
/// # Errors
///
/// Returns an error if the cart cannot be serialized.
pub fn encode_cart_payload(cart: &Cart) -> Result<String, CartCacheError> {
    Ok(serde_json::to_string(&CachedCart { cart: cart.clone() })?)
}

/// Parse a stored snapshot. Lines that are not valid are dropped later by the store.
///
/// # Errors
///
/// Returns an error if the payload is not a cached cart document.
pub fn decode_cart_payload(payload: &str) -> Result<Cart, CartCacheError> {
    let cached: CachedCart = serde_json::from_str(payload)?;
    Ok(cached.cart)
}

impl CartCache for LocalStorageCartCache {
    type Error = CartCacheError;

    fn store(&self, cart: &Cart) -> Result<(), Self::Error> {
        let payload = encode_cart_payload(cart)?;
        browser_storage()?
            .set_item(&self.key, &payload)
            .map_err(|err| CartCacheError::Storage(crate::dom::js_error_message(&err)))
    }

    fn load(&self) -> Result<Option<Cart>, Self::Error> {
        let stored = browser_storage()?
            .get_item(&self.key)
            .map_err(|err| CartCacheError::Storage(crate::dom::js_error_message(&err)))?;
        stored.as_deref().map(decode_cart_payload).transpose()
    }
}

#[cfg(target_arch = "wasm32")]
fn browser_storage() -> Result<web_sys::Storage, CartCacheError> {
    crate::dom::local_storage()
        .map_err(|err| CartCacheError::Storage(crate::dom::js_error_message(&err)))
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_storage() -> Result<web_sys::Storage, CartCacheError> {
    Err(CartCacheError::Unavailable)
}

/// Cart store persisted to `localStorage`.
pub type WebCartStore = CartStore<LocalStorageCartCache>;

/// Create a storefront over the embedded catalog and bundled config
#[must_use]
pub fn create_web_storefront() -> Storefront<EmbeddedCatalog> {
    Storefront::new(EmbeddedCatalog, bundled_config())
}

/// Load the embedded catalog.
///
/// # Errors
///
/// Returns an error if the bundled catalog is missing or malformed.
pub fn load_catalog() -> anyhow::Result<Catalog> {
    create_web_storefront()
        .load_catalog()
        .context("loading the bundled catalog")
}

/// Restore the cart from `localStorage`, falling back to an empty cart.
#[must_use]
pub fn restore_web_cart() -> WebCartStore {
    create_web_storefront()
        .restore_cart(LocalStorageCartCache::default())
        .unwrap_or_else(|err| {
            log::warn!("Starting with an empty cart: {err:#}");
            CartStore::with_cache(LocalStorageCartCache::default())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_loads() {
        let catalog = load_catalog().unwrap();
        assert_eq!(catalog.category_ids().first().map(String::as_str), Some("pizza"));
    }

    #[test]
    fn cart_payload_wraps_cart() {
        let catalog = load_catalog().unwrap();
        let cola = catalog.find_product("cola").unwrap();
        let mut store = CartStore::new();
        store
            .set_quantity(&LineItemSignature::bare("cola"), 2, Some(cola))
            .unwrap();

        let payload = encode_cart_payload(store.cart()).unwrap();
        assert!(payload.starts_with(r#"{"cart":{"#));
        let restored = decode_cart_payload(&payload).unwrap();
        assert_eq!(&restored, store.cart());
        assert!(decode_cart_payload("[]").is_err());
    }

    #[test]
    fn storage_is_unavailable_natively() {
        let cache = LocalStorageCartCache::default();
        assert_eq!(cache.key(), "storefront.cart");
        assert!(matches!(
            cache.store(&Cart::new()),
            Err(CartCacheError::Unavailable)
        ));
        let store = restore_web_cart();
        assert!(store.is_empty());
    }
}
