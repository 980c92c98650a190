//! Command implementations.

use std::fmt::Write as _;
use std::sync::Arc;

use cartwheel_cart::{
    CachedInventory, CartConfig, CartStore, FileStore, HttpInventoryClient, InventoryError,
    TracingNotifier,
};
use cartwheel_core::Cart;
use thiserror::Error;
use tracing::debug;

/// Errors that stop a command before it reaches the cart.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),
}

/// Wire the cart store to the configured inventory service and store file.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn open_store(config: &CartConfig) -> Result<CartStore, CliError> {
    let client = HttpInventoryClient::new(&config.inventory)?;
    let inventory = CachedInventory::new(client, &config.inventory);
    let persistence = FileStore::new(&config.store_path);
    debug!(
        inventory = %config.inventory.base_url,
        store = %config.store_path.display(),
        "Opening cart store"
    );

    Ok(CartStore::open(
        Arc::new(inventory),
        Arc::new(persistence),
        Arc::new(TracingNotifier),
        config.storage_key.clone(),
    ))
}

/// Print the cart to stdout.
#[allow(clippy::print_stdout)]
pub fn print_cart(cart: &Cart) {
    print!("{}", render_cart(cart));
}

/// Format the cart as a plain-text table.
#[must_use]
pub fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:>8}  {:>6}  {:>10}  TITLE", "ID", "AMOUNT", "PRICE");
    for line in cart {
        let price = line
            .product
            .price()
            .map_or_else(|| "-".to_string(), |price| format!("{price:.2}"));
        let _ = writeln!(
            out,
            "{:>8}  {:>6}  {:>10}  {}",
            line.product_id(),
            line.amount,
            price,
            line.product.title().unwrap_or("-")
        );
    }
    let _ = writeln!(out, "Total units: {}", cart.total_units());
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_cart(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_line_without_title_or_price() {
        let cart = Cart::from_json(r#"[{"id":4,"sku":"X-4","amount":2}]"#).unwrap();

        let rendered = render_cart(&cart);
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines[1].ends_with("-  -"));
        assert_eq!(lines[2], "Total units: 2");
    }

    #[test]
    fn test_render_cart() {
        let cart = Cart::from_json(
            r#"[
                {"id":1,"title":"Runner","price":179.9,"image":"","amount":2},
                {"id":12,"title":"Trail","price":5,"image":"","amount":1}
            ]"#,
        )
        .unwrap();

        let rendered = render_cart(&cart);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].ends_with("179.90  Runner"));
        assert!(lines[2].ends_with("5.00  Trail"));
        assert_eq!(lines[3], "Total units: 3");
    }
}
