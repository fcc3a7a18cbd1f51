//! Storefront Core
//!
//! Platform-agnostic logic for the storefront mini-app: the cart keyed by
//! canonical line-item signatures, category load tracking, the scroll-driven
//! category window and the picker/anchor navigation bridge.
//! This crate has no UI or browser dependencies.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod layout;
pub mod load_tracker;
pub mod navigation;
pub mod pricing;
pub mod signature;
pub mod window;

// Re-export commonly used types
pub use cart::{
    Cart, CartError, CartItemInfo, CartStore, CountSetter, LineAdditions, LineFormula, NoCache,
};
pub use catalog::{Catalog, Category, Product, ProductOption, SubProduct};
pub use config::{ConfigError, StorefrontConfig};
pub use layout::{ElementRect, LayoutProbe, SimulatedLayout, category_block_id};
pub use load_tracker::LoadTracker;
pub use navigation::{
    AnchorNavigator, MemoryNavigator, NavigationBridge, initial_category_index,
    products_anchor_url,
};
pub use pricing::{CatalogPricing, PricingRule, UnitPrices, calculate_effective_price};
pub use signature::{Additions, LineItemSignature};
pub use window::{CategoryOffsetMap, WindowEffect, WindowManager, WindowState};

/// Trait for abstracting catalog loading
/// Platform-specific implementations should provide this
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the ordered category list with its products
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be fetched or parsed.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Persistence sink for the cart. Notified after every mutation.
pub trait CartCache {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the current cart snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn store(&self, cart: &Cart) -> Result<(), Self::Error>;

    /// Read back the last persisted snapshot, if any
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot exists but cannot be read.
    fn load(&self) -> Result<Option<Cart>, Self::Error> {
        Ok(None)
    }
}

/// Wires the catalog source and config into ready-to-use sessions
pub struct Storefront<L>
where
    L: CatalogSource,
{
    catalog_source: L,
    config: StorefrontConfig,
}

impl<L> Storefront<L>
where
    L: CatalogSource,
{
    pub const fn new(catalog_source: L, config: StorefrontConfig) -> Self {
        Self {
            catalog_source,
            config,
        }
    }

    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Load the catalog from the configured source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog source fails.
    pub fn load_catalog(&self) -> Result<Catalog, L::Error> {
        self.catalog_source.load_catalog()
    }

    /// Build the category window for a page opened at `anchor`
    #[must_use]
    pub fn open_window(&self, catalog: &Catalog, anchor: Option<&str>) -> WindowManager {
        let category_ids = catalog.category_ids();
        let selected = initial_category_index(&category_ids, anchor);
        WindowManager::new(category_ids, selected, self.config.clone())
    }

    /// Restore the cart from its cache, starting empty when nothing was saved
    ///
    /// # Errors
    ///
    /// Returns an error if the cache holds a snapshot that cannot be read.
    pub fn restore_cart<C>(&self, cache: C) -> Result<CartStore<C>, anyhow::Error>
    where
        C: CartCache,
    {
        let cached = cache.load()?;
        let cart = cached.unwrap_or_default();
        log::debug!("restored cart with {} lines", cart.len());
        Ok(CartStore::with_initial(cart, cache))
    }
}
