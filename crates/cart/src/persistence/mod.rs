//! Durable key-value storage for the cart.
//!
//! The cart is written as one JSON string under a single namespaced key
//! after every successful mutation and read back once when a store opens.
//!
//! - [`FileStore`] - JSON file on disk, survives restarts
//! - [`MemoryStore`] - process-local map for tests and ephemeral sessions

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing durable state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("Corrupt store: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Value could not be encoded for storage.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backend refused the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key-value storage.
pub trait DurablePersistence: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<T: DurablePersistence + ?Sized> DurablePersistence for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}
