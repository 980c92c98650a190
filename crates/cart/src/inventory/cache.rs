//! Product metadata cache.

use async_trait::async_trait;
use cartwheel_core::{Product, ProductId, StockLevel};
use moka::future::Cache;
use tracing::{debug, instrument};

use super::{InventoryError, InventoryService};
use crate::config::InventoryConfig;

/// Caches catalog records in front of another [`InventoryService`].
///
/// Stock lookups always reach the wrapped service.
pub struct CachedInventory<I> {
    inner: I,
    products: Cache<ProductId, Product>,
}

impl<I: InventoryService> CachedInventory<I> {
    /// Wrap `inner` using the TTL and capacity from `config`.
    #[must_use]
    pub fn new(inner: I, config: &InventoryConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(config.product_cache_capacity)
            .time_to_live(config.product_cache_ttl)
            .build();

        Self { inner, products }
    }
}

#[async_trait]
impl<I: InventoryService> InventoryService for CachedInventory<I> {
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, InventoryError> {
        self.inner.stock(product_id).await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        if let Some(product) = self.products.get(&product_id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product = self.inner.product(product_id).await?;
        self.products.insert(product_id, product.clone()).await;
        Ok(product)
    }
}
