//! Catalog records as served by the inventory service.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::ProductId;

/// A product record from the catalog.
///
/// Only `id` is interpreted. Every other field, including `title`, `price`
/// and `image`, is kept exactly as the catalog sent it and written back
/// untouched. The accessors below decode the display fields on demand and
/// return `None` when a field is missing or has an unexpected type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog id.
    pub id: ProductId,
    /// Catalog fields other than `id`.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Create a product with the usual display fields.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Decimal,
        image: impl Into<String>,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert("title".to_string(), Value::String(title.into()));
        fields.insert("price".to_string(), decimal_to_json(price));
        fields.insert("image".to_string(), Value::String(image.into()));
        Self { id, fields }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.fields.get("image").and_then(Value::as_str)
    }

    /// Unit price, from a JSON number or a numeric string.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        match self.fields.get("price")? {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn decimal_to_json(value: Decimal) -> Value {
    if value.fract().is_zero()
        && let Some(whole) = value.to_i64()
    {
        return Value::from(whole);
    }
    value
        .to_f64()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let json = r#"{"id":3,"title":"Trail runner","price":179.9,"image":"https://cdn/3.jpg","brand":"Acme"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.title(), Some("Trail runner"));
        assert_eq!(product.price(), Some(Decimal::new(1799, 1)));
        assert_eq!(product.fields.get("brand"), Some(&Value::from("Acme")));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["brand"], "Acme");
        assert_eq!(back["price"], 179.9);
    }

    #[test]
    fn test_integer_price_written_back_as_integer() {
        let json = r#"{"id":1,"title":"Sock","price":10,"image":""}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.price(), Some(Decimal::new(10, 0)));
        let back = serde_json::to_value(&product).unwrap();
        assert!(back["price"].is_u64());
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn test_record_without_display_fields() {
        let product: Product = serde_json::from_str(r#"{"id":5,"sku":"X-5"}"#).unwrap();

        assert_eq!(product.id, ProductId::new(5));
        assert_eq!(product.title(), None);
        assert_eq!(product.price(), None);
        assert_eq!(product.image(), None);
        assert_eq!(
            serde_json::to_string(&product).unwrap(),
            r#"{"id":5,"sku":"X-5"}"#
        );
    }

    #[test]
    fn test_price_from_string_or_wrong_type() {
        let product: Product =
            serde_json::from_str(r#"{"id":1,"price":"12.50","title":7}"#).unwrap();
        assert_eq!(product.price(), Some(Decimal::new(1250, 2)));
        assert_eq!(product.title(), None);

        let product: Product = serde_json::from_str(r#"{"id":1,"price":null}"#).unwrap();
        assert_eq!(product.price(), None);
    }

    #[test]
    fn test_new_sets_display_fields() {
        let product = Product::new(ProductId::new(2), "Runner", Decimal::new(1999, 2), "a.jpg");

        assert_eq!(product.title(), Some("Runner"));
        assert_eq!(product.price(), Some(Decimal::new(1999, 2)));
        assert_eq!(product.image(), Some("a.jpg"));
        assert_eq!(product.fields["price"], 19.99);
    }
}
