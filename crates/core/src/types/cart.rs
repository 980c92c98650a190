//! Cart contents.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s, unique by product id.
//! Amounts are `NonZeroU32`, so an empty line can never be stored; removing
//! the last unit means removing the line.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Product, ProductId};

/// Cart invariant violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("duplicate line item for product {0}")]
    DuplicateProduct(ProductId),
}

/// One product in the cart with its requested quantity.
///
/// Serialized flat: the catalog record's fields plus `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: NonZeroU32,
}

impl LineItem {
    /// Build a line from a catalog record.
    ///
    /// An `amount` field in the record is dropped so the line's own amount
    /// is the only one written.
    #[must_use]
    pub fn new(mut product: Product, amount: NonZeroU32) -> Self {
        product.fields.remove("amount");
        Self { product, amount }
    }

    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }
}

/// Ordered line items, at most one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, rejecting duplicate product ids.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation::DuplicateProduct` for the first repeated id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, InvariantViolation> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id()) {
                return Err(InvariantViolation::DuplicateProduct(item.product_id()));
            }
        }
        Ok(Self { items })
    }

    /// Parse a cart from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, an amount is zero or
    /// a product id appears twice.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the cart to its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog field cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Current amount for a product, or 0 if it is not in the cart.
    #[must_use]
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.amount.get())
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.amount.get()))
            .sum()
    }

    /// `(product id, amount)` pairs in cart order.
    #[must_use]
    pub fn amounts(&self) -> Vec<(ProductId, u32)> {
        self.items
            .iter()
            .map(|item| (item.product_id(), item.amount.get()))
            .collect()
    }

    /// Append a new line.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation::DuplicateProduct` if the product already has a line.
    pub fn insert(&mut self, item: LineItem) -> Result<(), InvariantViolation> {
        if self.get(item.product_id()).is_some() {
            return Err(InvariantViolation::DuplicateProduct(item.product_id()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Add one unit to an existing line, returning the new amount.
    pub fn increment(&mut self, product_id: ProductId) -> Option<NonZeroU32> {
        let item = self.get_mut(product_id)?;
        item.amount = item.amount.saturating_add(1);
        Some(item.amount)
    }

    /// Set the amount of an existing line in place, returning the previous amount.
    pub fn set_amount(&mut self, product_id: ProductId, amount: NonZeroU32) -> Option<NonZeroU32> {
        let item = self.get_mut(product_id)?;
        Some(std::mem::replace(&mut item.amount, amount))
    }

    /// Remove a line, keeping the order of the others.
    pub fn remove(&mut self, product_id: ProductId) -> Option<LineItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)?;
        Some(self.items.remove(index))
    }

    fn get_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: i64) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Product {id}"),
            Decimal::new(1999, 2),
            format!("https://cdn.example/{id}.jpg"),
        )
    }

    fn line(id: i64, amount: u32) -> LineItem {
        LineItem::new(product(id), NonZeroU32::new(amount).unwrap())
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut cart = Cart::new();
        cart.insert(line(1, 1)).unwrap();
        let err = cart.insert(line(1, 3)).unwrap_err();

        assert_eq!(err, InvariantViolation::DuplicateProduct(ProductId::new(1)));
        assert_eq!(cart.amount_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_set_amount_keeps_position() {
        let mut cart = Cart::from_items(vec![line(1, 1), line(2, 1), line(3, 1)]).unwrap();
        let previous = cart.set_amount(ProductId::new(1), NonZeroU32::new(4).unwrap());

        assert_eq!(previous.map(NonZeroU32::get), Some(1));
        assert_eq!(
            cart.amounts(),
            vec![
                (ProductId::new(1), 4),
                (ProductId::new(2), 1),
                (ProductId::new(3), 1)
            ]
        );
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut cart = Cart::from_items(vec![line(1, 1), line(2, 2), line(3, 3)]).unwrap();
        let removed = cart.remove(ProductId::new(2)).unwrap();

        assert_eq!(removed.amount.get(), 2);
        assert_eq!(
            cart.amounts(),
            vec![(ProductId::new(1), 1), (ProductId::new(3), 3)]
        );
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_increment_missing_line() {
        let mut cart = Cart::new();
        assert!(cart.increment(ProductId::new(9)).is_none());
        assert_eq!(cart.amount_of(ProductId::new(9)), 0);
    }

    #[test]
    fn test_json_shape_is_flat() {
        let cart = Cart::from_items(vec![line(1, 2)]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();

        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["amount"], 2);
        assert_eq!(value[0]["title"], "Product 1");
        assert_eq!(value[0]["price"], 19.99);
    }

    #[test]
    fn test_from_json_accepts_stored_cart() {
        let json = r#"[
            {"id":1,"title":"Runner","price":179.9,"image":"a.jpg","amount":2},
            {"id":4,"title":"Trail","price":139.9,"image":"b.jpg","amount":1,"brand":"Acme"}
        ]"#;
        let cart = Cart::from_json(json).unwrap();

        assert_eq!(cart.total_units(), 3);
        let trail = cart.get(ProductId::new(4)).unwrap();
        assert_eq!(trail.product.fields.get("brand").unwrap(), "Acme");
        assert!(!trail.product.fields.contains_key("amount"));
    }

    #[test]
    fn test_catalog_amount_field_does_not_survive_into_line() {
        let product: Product = serde_json::from_str(
            r#"{"id":1,"title":"A","price":10,"image":"","amount":99}"#,
        )
        .unwrap();
        let cart = Cart::from_items(vec![LineItem::new(product, NonZeroU32::MIN)]).unwrap();

        let json = cart.to_json().unwrap();
        assert_eq!(json.matches("\"amount\"").count(), 1);

        let reloaded = Cart::from_json(&json).unwrap();
        assert_eq!(reloaded, cart);
        assert_eq!(reloaded.amount_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_stored_line_without_display_fields() {
        let json = r#"[{"id":8,"amount":3,"sku":"X-8"}]"#;
        let cart = Cart::from_json(json).unwrap();

        let line = cart.get(ProductId::new(8)).unwrap();
        assert_eq!(line.amount.get(), 3);
        assert_eq!(line.product.title(), None);
        assert_eq!(line.product.price(), None);

        let reloaded = Cart::from_json(&cart.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn test_from_json_rejects_zero_amount() {
        let json = r#"[{"id":1,"title":"Runner","price":1,"image":"","amount":0}]"#;
        assert!(Cart::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let json = r#"[
            {"id":1,"title":"Runner","price":1,"image":"","amount":1},
            {"id":1,"title":"Runner","price":1,"image":"","amount":2}
        ]"#;
        let err = Cart::from_json(json).unwrap_err();
        assert!(err.to_string().contains("duplicate line item for product 1"));
    }

    #[test]
    fn test_from_json_rejects_wrong_shape() {
        assert!(Cart::from_json(r#"{"id":1}"#).is_err());
        assert!(Cart::from_json("not json").is_err());
    }
}
