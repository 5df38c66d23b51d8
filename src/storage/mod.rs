//! Persistent key-value storage.
//!
//! [`KeyValueStorage`] is shaped like the browser's `localStorage`: string keys,
//! string values, synchronous reads and writes. Every write replaces the whole
//! value under a key, and that single-key overwrite is the only atomicity the
//! layer offers. Nothing spans two keys.
//!
//! [`JsonStore`] sits on top and deals in typed collections, swallowing corrupt
//! documents so callers only ever see a (possibly empty) sequence of records.

use std::io;

use mockall::automock;
use thiserror::Error;

mod file;
mod json;
mod memory;

pub use file::{FileStorage, StorageWatcher};
pub use json::JsonStore;
pub use memory::MemoryStorage;

/// Storage key holding the medication cart.
pub const CART_KEY: &str = "medicationCart";

/// Storage key holding the reminder list.
pub const REMINDERS_KEY: &str = "medicationReminders";

/// Errors raised by storage hosts when a write cannot be completed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The host refused the write (quota exceeded, storage disabled, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure in a file-backed host.
    #[error("storage I/O failure for key `{key}`")]
    Io {
        /// Key being written or removed.
        key: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// A collection could not be encoded as JSON.
    #[error("failed to encode `{key}`")]
    Encode {
        /// Key being written.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value storage.
#[automock]
pub trait KeyValueStorage {
    /// Read the raw value under `key`, `None` when absent or unreadable.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the host cannot persist the value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the host cannot remove the value.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
