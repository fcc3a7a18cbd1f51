//! Line item pricing
use crate::catalog::Product;
use crate::signature::Additions;

/// Regular and discounted price of a single unit, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitPrices {
    pub price_cents: i64,
    pub discounted_cents: i64,
}

/// Pricing collaborator: prices one unit of a product with the chosen additions.
pub trait PricingRule {
    fn unit_prices(&self, product: &Product, additions: &Additions) -> UnitPrices;
}

/// Default rule: base price plus addition prices, with the product discount
/// applied to the whole line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogPricing;

impl PricingRule for CatalogPricing {
    fn unit_prices(&self, product: &Product, additions: &Additions) -> UnitPrices {
        product_price(product, 1, additions)
    }
}

/// Price `quantity` units of `product` with the given additions.
///
/// Addition ids that are in neither the sub-product nor the option catalog
/// contribute nothing.
#[must_use]
pub fn product_price(product: &Product, quantity: u32, additions: &Additions) -> UnitPrices {
    let additions_cents: i64 = additions
        .iter()
        .map(|(id, qty)| product.addition_price(id).unwrap_or(0) * i64::from(*qty))
        .sum();
    let price_cents = (product.price_cents + additions_cents) * i64::from(quantity);
    UnitPrices {
        price_cents,
        discounted_cents: calculate_effective_price(price_cents, product.discount_pct),
    }
}

/// Calculate the effective price after a percentage discount.
/// Returns price in cents, rounded up.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn calculate_effective_price(base_price_cents: i64, discount_pct: f64) -> i64 {
    if discount_pct <= 0.0 {
        return base_price_cents;
    }

    let multiplier = 1.0 - (discount_pct.min(100.0) / 100.0);
    let discounted = base_price_cents as f64 * multiplier;
    discounted.ceil() as i64
}
