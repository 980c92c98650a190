//! The cart store.
//!
//! [`CartStore`] owns the committed cart and applies mutations against it.
//! Each mutation works in three steps:
//!
//! 1. **Stage** - clone the committed cart and apply the change to the copy,
//!    consulting the inventory service for a fresh stock level.
//! 2. **Persist** - write the staged cart to durable storage.
//! 3. **Swap** - replace the committed cart with the staged one.
//!
//! A failure at any step discards the staged copy, so no half-applied change
//! is ever visible. Mutations are serialized through a single writer lock;
//! readers take a snapshot of the committed cart and never wait on the network.
//!
//! # Example
//!
//! ```rust,ignore
//! let store = CartStore::open(inventory, persistence, notifier, DEFAULT_STORAGE_KEY);
//!
//! store.add_product(ProductId::new(1)).await;
//! store.update_product_amount(ProductId::new(1), 3).await;
//! assert_eq!(store.cart().amount_of(ProductId::new(1)), 3);
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;

use cartwheel_core::{Cart, LineItem, ProductId};
use parking_lot::RwLock;
use tracing::{error, info, instrument, warn};

use crate::error::{CartError, Result};
use crate::inventory::{InventoryError, InventoryService};
use crate::notify::{Notice, NotificationSink};
use crate::persistence::{DurablePersistence, PersistenceError};

/// Result of a cart mutation.
///
/// Rejections have already been reported to the notification sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The change was persisted and is now visible.
    Applied,
    /// Nothing changed; the notice was sent to the sink.
    Rejected(Notice),
}

impl Outcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    #[must_use]
    pub const fn notice(self) -> Option<Notice> {
        match self {
            Self::Applied => None,
            Self::Rejected(notice) => Some(notice),
        }
    }
}

/// Shopping cart synchronized with an inventory service and durable storage.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    inventory: Arc<dyn InventoryService>,
    persistence: Arc<dyn DurablePersistence>,
    notifier: Arc<dyn NotificationSink>,
    storage_key: String,
    committed: RwLock<Cart>,
    writer: tokio::sync::Mutex<()>,
}

impl CartStore {
    /// Open a store, loading the cart saved under `storage_key`.
    ///
    /// A missing, unreadable or invalid saved cart yields an empty cart.
    #[must_use]
    pub fn open(
        inventory: Arc<dyn InventoryService>,
        persistence: Arc<dyn DurablePersistence>,
        notifier: Arc<dyn NotificationSink>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let cart = load_cart(persistence.as_ref(), &storage_key);
        info!(key = %storage_key, lines = cart.len(), "Cart loaded");

        Self {
            inner: Arc::new(CartStoreInner {
                inventory,
                persistence,
                notifier,
                storage_key,
                committed: RwLock::new(cart),
                writer: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the committed cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner.committed.read().clone()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    /// Add one unit of a product, fetching its catalog record on first add.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Outcome {
        let _writer = self.inner.writer.lock().await;
        let result = match self.stage_add(product_id).await {
            Ok(next) => self.commit(next),
            Err(e) => Err(e),
        };
        self.settle(result, Notice::AddFailed)
    }

    /// Remove a product's line entirely.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Outcome {
        let _writer = self.inner.writer.lock().await;
        let result = self.stage_remove(product_id).and_then(|next| self.commit(next));
        self.settle(result, Notice::RemoveFailed)
    }

    /// Set a product's amount. Amounts below 1 are rejected, not treated as removal.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Outcome {
        let _writer = self.inner.writer.lock().await;
        let result = match self.stage_update(product_id, amount).await {
            Ok(next) => self.commit(next),
            Err(e) => Err(e),
        };
        self.settle(result, Notice::UpdateFailed)
    }

    // =========================================================================
    // Staging
    // =========================================================================

    async fn stage_add(&self, product_id: ProductId) -> Result<Cart> {
        let mut next = self.cart();
        let requested = i64::from(next.amount_of(product_id)) + 1;

        let stock = self.inner.inventory.stock(product_id).await?;
        if !stock.covers(requested) {
            return Err(CartError::StockExceeded {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        if next.increment(product_id).is_none() {
            let product = self.inner.inventory.product(product_id).await?;
            if product.id != product_id {
                return Err(InventoryError::Mismatch {
                    requested: product_id,
                    returned: product.id,
                }
                .into());
            }
            next.insert(LineItem::new(product, NonZeroU32::MIN))?;
        }

        Ok(next)
    }

    fn stage_remove(&self, product_id: ProductId) -> Result<Cart> {
        let mut next = self.cart();
        next.remove(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(next)
    }

    async fn stage_update(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        let mut next = self.cart();
        if next.get(product_id).is_none() {
            return Err(CartError::NotInCart(product_id));
        }
        if amount < 1 {
            return Err(CartError::InvalidAmount { product_id, amount });
        }

        let stock = self.inner.inventory.stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        // Fits in u32: it is positive and no larger than the stock level
        let amount = u32::try_from(amount)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(CartError::InvalidAmount { product_id, amount })?;
        next.set_amount(product_id, amount)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(next)
    }

    // =========================================================================
    // Commit
    // =========================================================================

    /// Persist `next`, then make it the committed cart.
    fn commit(&self, next: Cart) -> Result<()> {
        let encoded = next.to_json().map_err(PersistenceError::Encode)?;
        self.inner
            .persistence
            .set(&self.inner.storage_key, &encoded)?;
        *self.inner.committed.write() = next;
        Ok(())
    }

    /// Report the result of an operation and turn it into an [`Outcome`].
    fn settle(&self, result: Result<()>, fallback: Notice) -> Outcome {
        match result {
            Ok(()) => {
                info!("Cart updated");
                Outcome::Applied
            }
            Err(err) => {
                if err.is_rejection() {
                    info!(error = %err, "Cart operation rejected");
                } else {
                    error!(error = %err, "Cart operation failed");
                }
                let notice = err.notice(fallback);
                self.inner.notifier.error(notice.message());
                Outcome::Rejected(notice)
            }
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("cart", &*self.inner.committed.read())
            .finish_non_exhaustive()
    }
}

/// Read the saved cart, falling back to an empty one.
fn load_cart(persistence: &dyn DurablePersistence, key: &str) -> Cart {
    match persistence.get(key) {
        Ok(Some(raw)) => Cart::from_json(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "Saved cart is invalid, starting empty");
            Cart::new()
        }),
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "Could not read saved cart, starting empty");
            Cart::new()
        }
    }
}
