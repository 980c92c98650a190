//! Inventory REST client against the mock inventory server.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use cartwheel_cart::{CachedInventory, HttpInventoryClient, InventoryError, InventoryService};
use cartwheel_core::ProductId;
use cartwheel_integration_tests::MockInventory;
use rust_decimal::Decimal;
use serde_json::json;

fn client_for(mock: &MockInventory) -> HttpInventoryClient {
    HttpInventoryClient::new(&mock.config()).unwrap()
}

#[tokio::test]
async fn test_fetches_stock_level() {
    let mock = MockInventory::start().await;
    mock.add_product(1, "Runner", 179.9, 3);
    let client = client_for(&mock);

    let stock = client.stock(ProductId::new(1)).await.unwrap();

    assert_eq!(stock.product_id, ProductId::new(1));
    assert_eq!(stock.amount, 3);
    assert_eq!(mock.hits("stock/1"), 1);
}

#[tokio::test]
async fn test_fetches_product_with_extra_fields() {
    let mock = MockInventory::start().await;
    mock.add_product_json(
        7,
        json!({
            "id": 7,
            "title": "Trail",
            "price": 139.9,
            "image": "https://cdn.example.com/7.jpg",
            "brand": "Fastfoot",
        }),
    );
    let client = client_for(&mock);

    let product = client.product(ProductId::new(7)).await.unwrap();

    assert_eq!(product.id, ProductId::new(7));
    assert_eq!(product.title(), Some("Trail"));
    assert_eq!(product.price(), Some(Decimal::from_str("139.9").unwrap()));
    assert_eq!(product.fields.get("brand"), Some(&json!("Fastfoot")));
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let mock = MockInventory::start().await;
    let client = client_for(&mock);

    let err = client.stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(id) if id == ProductId::new(99)));

    let err = client.product(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, InventoryError::NotFound(_)));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let mock = MockInventory::start().await;
    mock.add_product(1, "Runner", 179.9, 3);
    mock.respond_with("stock/1", 503, "maintenance");
    let client = client_for(&mock);

    let err = client.stock(ProductId::new(1)).await.unwrap_err();

    match err {
        InventoryError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("Expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock = MockInventory::start().await;
    mock.respond_with("products/1", 200, "<html>not json</html>");
    mock.respond_with("stock/2", 200, r#"{"id":2,"amount":-4}"#);
    let client = client_for(&mock);

    let err = client.product(ProductId::new(1)).await.unwrap_err();
    assert!(matches!(err, InventoryError::Parse(_)));

    // Negative stock is not a valid level
    let err = client.stock(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, InventoryError::Parse(_)));
}

#[tokio::test]
async fn test_cache_fetches_product_once_and_stock_every_time() {
    let mock = MockInventory::start().await;
    mock.add_product(1, "Runner", 179.9, 3);
    let inventory = CachedInventory::new(client_for(&mock), &mock.config());

    for _ in 0..3 {
        inventory.product(ProductId::new(1)).await.unwrap();
        inventory.stock(ProductId::new(1)).await.unwrap();
    }

    assert_eq!(mock.hits("products/1"), 1);
    assert_eq!(mock.hits("stock/1"), 3);
}
