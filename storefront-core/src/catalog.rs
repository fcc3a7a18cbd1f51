//! Product catalog data: categories, products and their additions
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A selectable sub-product that can be added to a base product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubProduct {
    pub id: String,
    pub name: String,
    /// Price in cents to avoid floating-point issues
    pub price_cents: i64,
}

/// A product option (size, topping, packaging...). Options may be free.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price_cents: i64,
}

/// A single product offered by the store.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// Base price in cents
    pub price_cents: i64,
    /// Discount applied to the whole line, in percent
    #[serde(default)]
    pub discount_pct: f64,
    #[serde(default)]
    pub sub_products: Vec<SubProduct>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Product {
    /// Sub-product catalog keyed by id.
    #[must_use]
    pub fn sub_products_map(&self) -> BTreeMap<&str, &SubProduct> {
        self.sub_products
            .iter()
            .map(|sub| (sub.id.as_str(), sub))
            .collect()
    }

    /// Option catalog keyed by id.
    #[must_use]
    pub fn options_map(&self) -> BTreeMap<&str, &ProductOption> {
        self.options
            .iter()
            .map(|opt| (opt.id.as_str(), opt))
            .collect()
    }

    /// Unit price of an addition id, whichever catalog it lives in.
    #[must_use]
    pub fn addition_price(&self, addition_id: &str) -> Option<i64> {
        self.sub_products
            .iter()
            .find(|sub| sub.id == addition_id)
            .map(|sub| sub.price_cents)
            .or_else(|| {
                self.options
                    .iter()
                    .find(|opt| opt.id == addition_id)
                    .map(|opt| opt.price_cents)
            })
    }
}

/// A product category, rendered as one block of the catalog window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Ordered category list supplied by the catalog backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// Parse a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn category_ids(&self) -> Vec<String> {
        self.categories.iter().map(|cat| cat.id.clone()).collect()
    }

    #[must_use]
    pub fn category_index(&self, category_id: &str) -> Option<usize> {
        self.categories.iter().position(|cat| cat.id == category_id)
    }

    /// Find a product by ID across all categories.
    #[must_use]
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.categories
            .iter()
            .flat_map(|cat| cat.products.iter())
            .find(|product| product.id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> Product {
        Product {
            id: String::from("pizza"),
            name: String::from("Pizza"),
            desc: String::new(),
            price_cents: 1_000,
            discount_pct: 0.0,
            sub_products: vec![SubProduct {
                id: String::from("cheese"),
                name: String::from("Extra cheese"),
                price_cents: 150,
            }],
            options: vec![ProductOption {
                id: String::from("thin"),
                name: String::from("Thin crust"),
                price_cents: 0,
            }],
            photos: Vec::new(),
        }
    }

    #[test]
    fn addition_price_checks_both_catalogs() {
        let product = pizza();
        assert_eq!(product.addition_price("cheese"), Some(150));
        assert_eq!(product.addition_price("thin"), Some(0));
        assert_eq!(product.addition_price("anchovy"), None);
    }

    #[test]
    fn catalog_lookups_by_id() {
        let catalog = Catalog::from_json(
            r#"{"categories":[
                {"id":"a","name":"A"},
                {"id":"b","name":"B","products":[{"id":"p1","name":"P1","price_cents":10}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(catalog.category_ids(), vec!["a", "b"]);
        assert_eq!(catalog.category_index("b"), Some(1));
        assert_eq!(catalog.category_index("zzz"), None);
        assert_eq!(catalog.find_product("p1").map(|p| p.price_cents), Some(10));
    }
}
