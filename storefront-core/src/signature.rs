//! Canonical cart line item signatures.
//!
//! A line item is identified by its product and the quantities of the chosen
//! additions. The encoded form is a JSON object with sorted keys, so two
//! additions maps holding the same pairs always encode to the same string no
//! matter how they were built. [`LineItemSignature::encode`] and
//! [`LineItemSignature::decode`] are the only ways cart keys are produced and
//! read back.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::cart::CartError;

/// Addition id to quantity. Sorted by construction.
pub type Additions = BTreeMap<String, u32>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineItemSignature {
    pub product_id: String,
    pub additions: Additions,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireSignature {
    additions: Additions,
    #[serde(rename = "prodId")]
    prod_id: String,
}

impl LineItemSignature {
    #[must_use]
    pub fn new(product_id: impl Into<String>, additions: Additions) -> Self {
        Self {
            product_id: product_id.into(),
            additions,
        }
    }

    /// Signature of the product without any additions.
    #[must_use]
    pub fn bare(product_id: impl Into<String>) -> Self {
        Self::new(product_id, Additions::new())
    }

    /// Canonical string form used as the cart key.
    #[must_use]
    pub fn encode(&self) -> String {
        let additions: Map<String, Value> = self
            .additions
            .iter()
            .map(|(id, qty)| (id.clone(), Value::from(*qty)))
            .collect();
        let mut root = Map::new();
        root.insert(String::from("additions"), Value::Object(additions));
        root.insert(
            String::from("prodId"),
            Value::String(self.product_id.clone()),
        );
        Value::Object(root).to_string()
    }

    /// Parse a canonical signature.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MalformedSignature`] when the input is not a
    /// `{additions, prodId}` object or is not in canonical form.
    pub fn decode(encoded: &str) -> Result<Self, CartError> {
        let malformed = |reason: String| CartError::MalformedSignature {
            signature: encoded.to_string(),
            reason,
        };
        let wire: WireSignature =
            serde_json::from_str(encoded).map_err(|err| malformed(err.to_string()))?;
        if wire.prod_id.is_empty() {
            return Err(malformed(String::from("empty product id")));
        }
        let signature = Self::new(wire.prod_id, wire.additions);
        if signature.encode() != encoded {
            return Err(malformed(String::from("not in canonical form")));
        }
        Ok(signature)
    }

    #[must_use]
    pub fn addition_ids(&self) -> impl Iterator<Item = &str> {
        self.additions.keys().map(String::as_str)
    }
}

impl fmt::Display for LineItemSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for LineItemSignature {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_change_signature() {
        let mut forward = Additions::new();
        forward.insert(String::from("opt1"), 1);
        forward.insert(String::from("cheese"), 2);
        let mut backward = Additions::new();
        backward.insert(String::from("cheese"), 2);
        backward.insert(String::from("opt1"), 1);

        let a = LineItemSignature::new("p1", forward).encode();
        let b = LineItemSignature::new("p1", backward).encode();
        assert_eq!(a, b);
        assert_eq!(a, r#"{"additions":{"cheese":2,"opt1":1},"prodId":"p1"}"#);
    }

    #[test]
    fn bare_and_customized_signatures_differ() {
        let bare = LineItemSignature::bare("p1");
        let custom = LineItemSignature::new("p1", Additions::from([(String::from("opt1"), 1)]));
        assert_ne!(bare.encode(), custom.encode());
        assert_eq!(bare.encode(), r#"{"additions":{},"prodId":"p1"}"#);
    }

    #[test]
    fn decode_accepts_canonical_form() {
        let original = LineItemSignature::new("p\"1", Additions::from([(String::from("x"), 3)]));
        let decoded: LineItemSignature = original.encode().parse().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_rejects_non_canonical_and_foreign_shapes() {
        for input in [
            r#"{"prodId":"p1","additions":{}}"#,
            r#"{"additions":{"b":1,"a":1},"prodId":"p1"}"#,
            r#"{"additions":{},"prodId":"p1","extra":true}"#,
            r#"{"additions":{"a":-1},"prodId":"p1"}"#,
            r#"{"additions":{},"prodId":""}"#,
            "p1",
            "",
        ] {
            let err = LineItemSignature::decode(input).unwrap_err();
            assert!(
                matches!(err, CartError::MalformedSignature { .. }),
                "{input} should be malformed"
            );
        }
    }
}
