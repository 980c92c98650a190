//! Cart operation errors.
//!
//! [`CartError`] is internal to a single operation: the store converts it to
//! a [`Notice`] at the operation boundary and never hands it to callers.

use cartwheel_core::{InvariantViolation, ProductId};
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::notify::Notice;
use crate::persistence::PersistenceError;

/// Why a cart operation did not apply.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount is larger than the current stock.
    #[error("Requested {requested} of product {product_id} but only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested amount is below 1 or out of range.
    #[error("Invalid amount {amount} for product {product_id}")]
    InvalidAmount { product_id: ProductId, amount: i64 },

    /// Staged cart broke an invariant.
    #[error("Cart invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Inventory lookup failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Durable write failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CartError {
    /// Input was refused by a cart rule rather than a failing collaborator.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::StockExceeded { .. } | Self::NotInCart(_) | Self::InvalidAmount { .. }
        )
    }

    /// Notice to show for this error, given the operation's generic notice.
    #[must_use]
    pub const fn notice(&self, fallback: Notice) -> Notice {
        match self {
            Self::StockExceeded { .. } => Notice::StockExceeded,
            _ => fallback,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
