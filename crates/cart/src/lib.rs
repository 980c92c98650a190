//! Cartwheel cart library.
//!
//! A shopping cart kept in memory, checked against a remote inventory
//! service and mirrored to durable key-value storage after every change.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - the cart and its three mutations
//! - [`inventory`] - stock and catalog lookups (`reqwest` client, `moka` product cache)
//! - [`persistence`] - synchronous key-value storage (JSON file, in-memory)
//! - [`notify`] - user-facing notices for rejected operations
//! - [`config`] - environment-driven configuration
//!
//! Collaborators are injected when the store is opened; nothing is global.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod notify;
pub mod persistence;
pub mod store;

pub use config::{CartConfig, ConfigError, DEFAULT_STORAGE_KEY, InventoryConfig};
pub use error::CartError;
pub use inventory::{CachedInventory, HttpInventoryClient, InventoryError, InventoryService};
pub use notify::{ChannelNotifier, Notice, NotificationSink, RecordingNotifier, TracingNotifier};
pub use persistence::{DurablePersistence, FileStore, MemoryStore, PersistenceError};
pub use store::{CartStore, Outcome};
