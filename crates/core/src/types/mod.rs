//! Core types for Cartwheel.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;
pub mod stock;

pub use cart::{Cart, InvariantViolation, LineItem};
pub use id::*;
pub use product::Product;
pub use stock::StockLevel;
