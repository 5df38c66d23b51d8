//! Typed JSON collections over a [`KeyValueStorage`].

use std::{fmt, rc::Rc};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{trace, warn};

use super::{KeyValueStorage, StorageError};

/// Reads and writes JSON arrays of records under storage keys.
#[derive(Clone)]
pub struct JsonStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonStore").finish_non_exhaustive()
    }
}

impl JsonStore {
    /// Wrap a storage host.
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load the collection under `key`.
    ///
    /// An absent key, or a stored value that is not a JSON array of `T`, loads
    /// as an empty collection. Corruption is logged and otherwise swallowed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.storage.get_item(key) else {
            trace!(key, "storage key absent, loading empty collection");
            return Vec::new();
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(error) => {
                warn!(key, %error, "corrupt collection in storage, loading empty collection");
                Vec::new()
            }
        }
    }

    /// Overwrite the collection under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when encoding fails or the host rejects the write.
    pub fn save<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(records).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.storage.set_item(key, &encoded)?;

        trace!(key, records = records.len(), "collection saved");

        Ok(())
    }
}
