//! Stock snapshots.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// How many units of a product can currently be bought.
///
/// Fetched fresh for every cart mutation and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub amount: u32,
}

impl StockLevel {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Whether `requested` units fit within this stock level.
    #[must_use]
    pub fn covers(&self, requested: i64) -> bool {
        requested <= i64::from(self.amount)
    }
}
