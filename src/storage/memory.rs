//! In-memory storage host.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::{KeyValueStorage, StorageError};

/// Storage that lives only as long as the process, one "tab" worth of state.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<FxHashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_then_get_returns_value() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item("k", "v")?;

        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
        assert_eq!(storage.len(), 1);

        Ok(())
    }

    #[test]
    fn set_overwrites_previous_value() -> TestResult {
        let storage = MemoryStorage::new();

        storage.set_item("k", "old")?;
        storage.set_item("k", "new")?;

        assert_eq!(storage.get_item("k").as_deref(), Some("new"));

        Ok(())
    }

    #[test]
    fn remove_absent_key_succeeds() -> TestResult {
        let storage = MemoryStorage::new();

        storage.remove_item("missing")?;

        assert!(storage.is_empty());

        Ok(())
    }
}
