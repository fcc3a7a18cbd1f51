//! Cart store: line items keyed by canonical signature, plus derived totals
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use thiserror::Error;

use crate::CartCache;
use crate::catalog::{Product, ProductOption, SubProduct};
use crate::pricing::{CatalogPricing, PricingRule};
use crate::signature::{Additions, LineItemSignature};

/// Cart contract violations. These indicate a caller bug and are surfaced
/// rather than swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("cannot set line item {signature} to {count}: no product supplied")]
    InvalidMutation { signature: String, count: u32 },
    #[error("cannot price line item {signature} with product {product_id}")]
    ProductMismatch { signature: String, product_id: String },
    #[error("malformed line item signature {signature:?}: {reason}")]
    MalformedSignature { signature: String, reason: String },
    #[error("line item {signature} is not in the cart")]
    UnknownLineItem { signature: String },
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItemInfo {
    /// Always greater than zero while the line exists
    pub count: u32,
    pub product: Product,
    pub unit_price_cents: i64,
    pub discounted_unit_price_cents: i64,
}

/// Cart contents keyed by encoded [`LineItemSignature`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<String, CartItemInfo>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, signature: &str) -> Option<&CartItemInfo> {
        self.lines.get(signature)
    }

    #[must_use]
    pub fn contains(&self, signature: &str) -> bool {
        self.lines.contains_key(signature)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CartItemInfo)> {
        self.lines.iter().map(|(key, info)| (key.as_str(), info))
    }

    /// Drop lines whose key is not a canonical signature or whose count is zero.
    /// Used on snapshots coming back from the persistent cache.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.lines.retain(|key, info| {
            let keep = info.count > 0 && LineItemSignature::decode(key).is_ok();
            if !keep {
                log::warn!("Dropping invalid cached cart line {key}");
            }
            keep
        });
        self
    }
}

/// How a caller identifies a line: raw additions (canonicalized here) or an
/// already encoded signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFormula {
    Additions(Additions),
    Signature(String),
}

impl Default for LineFormula {
    fn default() -> Self {
        Self::Additions(Additions::new())
    }
}

impl From<Additions> for LineFormula {
    fn from(additions: Additions) -> Self {
        Self::Additions(additions)
    }
}

impl From<&str> for LineFormula {
    fn from(signature: &str) -> Self {
        Self::Signature(signature.to_string())
    }
}

impl From<String> for LineFormula {
    fn from(signature: String) -> Self {
        Self::Signature(signature)
    }
}

/// Mutator bound to one line item; the product travels with it so positive
/// counts can always be priced.
#[derive(Debug, Clone, PartialEq)]
pub struct CountSetter {
    signature: LineItemSignature,
    product: Product,
}

impl CountSetter {
    #[must_use]
    pub const fn signature(&self) -> &LineItemSignature {
        &self.signature
    }

    /// Set the bound line's count.
    ///
    /// # Errors
    ///
    /// Propagates [`CartStore::set_quantity`] errors.
    pub fn apply<C, P>(&self, store: &mut CartStore<C, P>, count: u32) -> Result<bool, CartError>
    where
        C: CartCache,
        P: PricingRule,
    {
        store.set_quantity(&self.signature, count, Some(&self.product))
    }
}

/// Additions of a cart line resolved against the product's catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAdditions<'a> {
    pub sub_products: BTreeMap<&'a str, &'a SubProduct>,
    pub options: BTreeMap<&'a str, &'a ProductOption>,
}

/// Cache sink used when no persistence is wired in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCache;

impl CartCache for NoCache {
    type Error = Infallible;

    fn store(&self, _cart: &Cart) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Owns the cart and keeps the persistence sink informed of every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CartStore<C = NoCache, P = CatalogPricing> {
    cart: Cart,
    cache: C,
    pricing: P,
}

impl CartStore {
    /// Empty cart, no persistence, catalog pricing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_initial(Cart::new(), NoCache)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CartCache> CartStore<C> {
    #[must_use]
    pub fn with_cache(cache: C) -> Self {
        Self::with_initial(Cart::new(), cache)
    }

    /// Seed the store from a cached snapshot. Invalid lines are dropped.
    #[must_use]
    pub fn with_initial(cart: Cart, cache: C) -> Self {
        CartStore {
            cart: cart.sanitized(),
            cache,
            pricing: CatalogPricing,
        }
    }
}

impl<C: CartCache, P: PricingRule> CartStore<C, P> {
    #[must_use]
    pub fn with_pricing<Q: PricingRule>(self, pricing: Q) -> CartStore<C, Q> {
        CartStore {
            cart: self.cart,
            cache: self.cache,
            pricing,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Set the count of a line item. Zero removes the line.
    ///
    /// Returns the reserved "consumed" flag, which is currently always `false`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidMutation`] when `count > 0` and no product
    /// is supplied, and [`CartError::ProductMismatch`] when the product is not
    /// the one the signature names. The cart is left untouched in both cases.
    pub fn set_quantity(
        &mut self,
        signature: &LineItemSignature,
        count: u32,
        product: Option<&Product>,
    ) -> Result<bool, CartError> {
        let key = signature.encode();
        if count > 0 {
            let Some(product) = product else {
                return Err(CartError::InvalidMutation {
                    signature: key,
                    count,
                });
            };
            if product.id != signature.product_id {
                return Err(CartError::ProductMismatch {
                    signature: key,
                    product_id: product.id.clone(),
                });
            }
            let prices = self.pricing.unit_prices(product, &signature.additions);
            self.cart.lines.insert(
                key,
                CartItemInfo {
                    count,
                    product: product.clone(),
                    unit_price_cents: prices.price_cents,
                    discounted_unit_price_cents: prices.discounted_cents,
                },
            );
        } else {
            self.cart.lines.remove(&key);
        }

        self.notify_cache();
        Ok(false)
    }

    /// Remove the bare product line (no additions).
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature is always well formed.
    pub fn remove(&mut self, product_id: &str) -> Result<bool, CartError> {
        self.set_quantity(&LineItemSignature::bare(product_id), 0, None)
    }

    pub fn clear(&mut self) {
        self.cart = Cart::new();
        self.notify_cache();
    }

    /// Swap the whole cart without notifying the cache.
    pub fn replace(&mut self, cart: Cart) {
        self.cart = cart.sanitized();
    }

    /// Current count, a bound setter and the canonical signature for a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedSignature`] when `formula` is a signature
    /// string that does not decode, and [`CartError::ProductMismatch`] when it
    /// names another product.
    pub fn get_count(
        &self,
        product: &Product,
        formula: impl Into<LineFormula>,
    ) -> Result<(u32, CountSetter, LineItemSignature), CartError> {
        let signature = match formula.into() {
            LineFormula::Additions(additions) => {
                LineItemSignature::new(product.id.clone(), additions)
            }
            LineFormula::Signature(encoded) => LineItemSignature::decode(&encoded)?,
        };
        if signature.product_id != product.id {
            return Err(CartError::ProductMismatch {
                signature: signature.encode(),
                product_id: product.id.clone(),
            });
        }
        let count = self.count(&signature);
        let setter = CountSetter {
            signature: signature.clone(),
            product: product.clone(),
        };
        Ok((count, setter, signature))
    }

    #[must_use]
    pub fn count(&self, signature: &LineItemSignature) -> u32 {
        self.cart
            .get(&signature.encode())
            .map_or(0, |line| line.count)
    }

    /// Resolve a line's additions back to catalog entries of its product.
    ///
    /// # Errors
    ///
    /// [`CartError::UnknownLineItem`] when the signature is not in the cart,
    /// [`CartError::MalformedSignature`] when it does not decode.
    pub fn line_additions(&self, signature: &str) -> Result<LineAdditions<'_>, CartError> {
        let line = self
            .cart
            .get(signature)
            .ok_or_else(|| CartError::UnknownLineItem {
                signature: signature.to_string(),
            })?;
        let decoded = LineItemSignature::decode(signature)?;
        let sub_products = line.product.sub_products_map();
        let options = line.product.options_map();

        let mut resolved = LineAdditions::default();
        for id in decoded.addition_ids() {
            if let Some((key, sub)) = sub_products.get_key_value(id) {
                resolved.sub_products.insert(*key, *sub);
            }
            if let Some((key, opt)) = options.get_key_value(id) {
                resolved.options.insert(*key, *opt);
            }
        }
        Ok(resolved)
    }

    /// Sum of `count * discounted unit price` over all lines.
    #[must_use]
    pub fn cart_cost(&self) -> i64 {
        self.sum_each_line(|line| line.discounted_unit_price_cents)
    }

    /// Sum of `count * (discounted - regular)` over all lines; zero or negative.
    #[must_use]
    pub fn cart_discount(&self) -> i64 {
        self.sum_each_line(|line| line.discounted_unit_price_cents - line.unit_price_cents)
    }

    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.lines.values().map(|line| line.count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Lines in signature order, for summary views.
    pub fn lines(&self) -> impl Iterator<Item = (&str, &CartItemInfo)> {
        self.cart.iter()
    }

    fn sum_each_line(&self, convert: impl Fn(&CartItemInfo) -> i64) -> i64 {
        self.cart
            .lines
            .values()
            .map(|line| i64::from(line.count) * convert(line))
            .sum()
    }

    fn notify_cache(&self) {
        if let Err(err) = self.cache.store(&self.cart) {
            log::warn!("Cart cache update failed, keeping in-memory cart: {err}");
        }
    }
}
