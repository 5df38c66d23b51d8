//! Carts Repository

use mockall::automock;

use crate::{
    domain::carts::models::CartItem,
    storage::{CART_KEY, JsonStore, StorageError},
};

/// Load/save access to the persisted cart.
#[automock]
pub trait CartRepository {
    /// Current cart; empty when absent or corrupt.
    fn load(&self) -> Vec<CartItem>;

    /// Overwrite the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write fails.
    fn save(&self, items: &[CartItem]) -> Result<(), StorageError>;
}

/// [`CartRepository`] over the `medicationCart` storage key.
#[derive(Debug, Clone)]
pub struct StoredCartRepository {
    store: JsonStore,
}

impl StoredCartRepository {
    /// Repository over the cart key of `store`.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

impl CartRepository for StoredCartRepository {
    fn load(&self) -> Vec<CartItem> {
        self.store.load(CART_KEY)
    }

    fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        self.store.save(CART_KEY, items)
    }
}
