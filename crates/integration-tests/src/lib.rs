//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```
//!
//! Tests run against [`MockInventory`], an in-process axum server that
//! speaks the inventory REST API on an ephemeral port. No external services
//! are needed.
//!
//! # Test Categories
//!
//! - `http_inventory` - REST client against the mock server
//! - `cart_flow` - cart store with the HTTP client and a file-backed store

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cartwheel_cart::InventoryConfig;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct MockState {
    stock: Mutex<HashMap<i64, u32>>,
    products: Mutex<HashMap<i64, Value>>,
    // Raw responses keyed by request path, checked before the maps above.
    overrides: Mutex<HashMap<String, (StatusCode, String)>>,
    hits: Mutex<HashMap<String, usize>>,
}

impl MockState {
    fn record(&self, path: &str) -> Option<Response> {
        *self.hits.lock().entry(path.to_string()).or_default() += 1;
        self.overrides
            .lock()
            .get(path)
            .map(|(status, body)| (*status, body.clone()).into_response())
    }
}

/// In-process inventory service.
///
/// The server stops when the value is dropped.
pub struct MockInventory {
    base_url: String,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockInventory {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/api/stock/{id}", get(stock))
            .route("/api/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock inventory");
        let addr = listener
            .local_addr()
            .expect("Mock inventory has no local address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/api/"),
            state,
            handle,
        }
    }

    /// Inventory configuration targeting this server.
    #[must_use]
    pub fn config(&self) -> InventoryConfig {
        InventoryConfig::new(&self.base_url).expect("Mock base URL is valid")
    }

    /// Register a catalog product with its stock level.
    pub fn add_product(&self, id: i64, title: &str, price: f64, stock: u32) {
        self.add_product_json(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.example.com/{id}.jpg"),
            }),
        );
        self.set_stock(id, stock);
    }

    /// Register a catalog record verbatim.
    pub fn add_product_json(&self, id: i64, record: Value) {
        self.state.products.lock().insert(id, record);
    }

    pub fn set_stock(&self, id: i64, amount: u32) {
        self.state.stock.lock().insert(id, amount);
    }

    /// Answer `path` (relative to the base URL) with a fixed status and body.
    pub fn respond_with(&self, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("Valid status code");
        self.state
            .overrides
            .lock()
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Number of requests received for `path` (relative to the base URL).
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.state.hits.lock().get(path).copied().unwrap_or(0)
    }
}

impl Drop for MockInventory {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn stock(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if let Some(response) = state.record(&format!("stock/{id}")) {
        return response;
    }
    match state.stock.lock().get(&id) {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if let Some(response) = state.record(&format!("products/{id}")) {
        return response;
    }
    match state.products.lock().get(&id) {
        Some(record) => Json(record.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
