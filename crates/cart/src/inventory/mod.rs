//! Inventory service access.
//!
//! # Architecture
//!
//! - [`InventoryService`] is the seam the cart store depends on
//! - [`HttpInventoryClient`] talks to the REST inventory API with `reqwest`
//! - [`CachedInventory`] wraps any service and caches product metadata via `moka`
//!
//! Stock levels are never cached: every cart mutation asks for a fresh figure.
//!
//! # Example
//!
//! ```rust,ignore
//! use cartwheel_cart::inventory::{CachedInventory, HttpInventoryClient};
//!
//! let client = HttpInventoryClient::new(&config.inventory)?;
//! let inventory = CachedInventory::new(client, &config.inventory);
//!
//! let stock = inventory.stock(ProductId::new(1)).await?;
//! let product = inventory.product(ProductId::new(1)).await?;
//! ```

mod cache;
mod http;

pub use cache::CachedInventory;
pub use http::HttpInventoryClient;

use async_trait::async_trait;
use cartwheel_core::{Product, ProductId, StockLevel};
use thiserror::Error;

/// Errors that can occur when talking to the inventory service.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The service does not know the product.
    #[error("Not found: product {0}")]
    NotFound(ProductId),

    /// Response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service answered for a different product than requested.
    #[error("Requested product {requested} but received {returned}")]
    Mismatch {
        requested: ProductId,
        returned: ProductId,
    },

    /// Request URL could not be built.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// Lookup failed for another reason (used by in-process implementations).
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of stock and catalog data.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Current stock for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, InventoryError>;

    /// Full catalog record for a product.
    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError>;
}

#[async_trait]
impl<T: InventoryService + ?Sized> InventoryService for std::sync::Arc<T> {
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, InventoryError> {
        (**self).stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        (**self).product(product_id).await
    }
}
