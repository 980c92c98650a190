//! Cartwheel Core - Shared cart domain types.
//!
//! This crate provides the types used across all Cartwheel components:
//! - `cart` - The cart store and its inventory, persistence and notification collaborators
//! - `cli` - Command-line front end for inspecting and mutating a cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, catalog records, line items, stock snapshots and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
