//! REST client for the inventory service.
//!
//! - `GET {base}/stock/{id}` returns `{ "amount": n }`
//! - `GET {base}/products/{id}` returns the catalog record

use async_trait::async_trait;
use cartwheel_core::{Product, ProductId, StockLevel};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{InventoryError, InventoryService};
use crate::config::InventoryConfig;

/// How much of an unexpected response body ends up in logs and errors.
const BODY_PREVIEW_CHARS: usize = 200;

/// Stock endpoint payload.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: u32,
}

/// HTTP client for the inventory service.
#[derive(Clone)]
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpInventoryClient {
    /// Create a new inventory client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a JSON resource relative to the base URL.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        product_id: ProductId,
    ) -> Result<T, InventoryError> {
        let url = self.base_url.join(path)?;

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(product_id));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %preview(&response_text),
                "Inventory API returned non-success status"
            );
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message: preview(&response_text),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %preview(&response_text),
                "Failed to parse inventory response"
            );
            InventoryError::Parse(e)
        })
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, InventoryError> {
        let body: StockResponse = self
            .get_json(&format!("stock/{product_id}"), product_id)
            .await?;
        debug!(amount = body.amount, "Fetched stock level");
        Ok(StockLevel::new(product_id, body.amount))
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<Product, InventoryError> {
        let product: Product = self
            .get_json(&format!("products/{product_id}"), product_id)
            .await?;

        debug!(title = product.title().unwrap_or_default(), "Fetched product");
        Ok(product)
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates() {
        let body = "x".repeat(1000);
        assert_eq!(preview(&body).len(), BODY_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_stock_response_rejects_negative() {
        assert!(serde_json::from_str::<StockResponse>(r#"{"id":1,"amount":-1}"#).is_err());
        let body: StockResponse = serde_json::from_str(r#"{"id":1,"amount":3}"#).unwrap();
        assert_eq!(body.amount, 3);
    }

    #[test]
    fn test_client_keeps_base_url() {
        let config = InventoryConfig::new("http://localhost:3333/api").unwrap();
        let client = HttpInventoryClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3333/api/");
    }
}
