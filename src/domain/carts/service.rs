//! Carts service.
//!
//! Every mutation is one uninterrupted load → validate → save → publish cycle
//! against the cart key. Operations that end up changing nothing (an unknown
//! index, a batch of names already in the cart) skip the write and stay
//! silent.

use std::{fmt, rc::Rc};

use mockall::automock;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    bus::{ChangeBus, Topic},
    domain::carts::{
        errors::CartsServiceError, models::CartItem, repository::CartRepository,
    },
};

/// [`CartsService`] over a [`CartRepository`], announcing changes on the bus.
#[derive(Clone)]
pub struct StoredCartsService {
    repository: Rc<dyn CartRepository>,
    bus: ChangeBus,
}

impl fmt::Debug for StoredCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCartsService")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl StoredCartsService {
    /// Service that publishes [`Topic::CartChanged`] on `bus` after each write.
    #[must_use]
    pub fn new(repository: Rc<dyn CartRepository>, bus: ChangeBus) -> Self {
        Self { repository, bus }
    }

    fn commit(&self, items: &[CartItem]) -> Result<(), CartsServiceError> {
        self.repository.save(items)?;
        self.bus.publish(Topic::CartChanged);

        Ok(())
    }
}

impl CartsService for StoredCartsService {
    fn items(&self) -> Vec<CartItem> {
        self.repository.load()
    }

    fn add_medications(&self, candidates: Vec<CartItem>) -> Result<usize, CartsServiceError> {
        candidates.iter().try_for_each(CartItem::validate)?;

        let mut cart = self.repository.load();
        let mut names: FxHashSet<String> = cart.iter().map(|item| item.name.clone()).collect();
        let before = cart.len();

        for mut candidate in candidates {
            if names.insert(candidate.name.clone()) {
                candidate.quantity = candidate.effective_quantity();
                cart.push(candidate);
            } else {
                debug!(name = %candidate.name, "medication already in cart, skipping");
            }
        }

        let added = cart.len() - before;

        if added > 0 {
            self.commit(&cart)?;
            info!(added, cart_size = cart.len(), "medications added to cart");
        }

        Ok(added)
    }

    fn update_quantity(&self, index: usize, delta: i64) -> Result<(), CartsServiceError> {
        let mut cart = self.repository.load();

        let Some(item) = cart.get_mut(index) else {
            debug!(index, "quantity update for unknown cart index ignored");
            return Ok(());
        };

        let next = i64::from(item.effective_quantity())
            .saturating_add(delta)
            .max(1);
        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);

        debug!(index, name = %item.name, quantity = item.quantity, "cart quantity updated");

        self.commit(&cart)
    }

    fn remove_item(&self, index: usize) -> Result<Option<CartItem>, CartsServiceError> {
        let mut cart = self.repository.load();

        if index >= cart.len() {
            debug!(index, "removal of unknown cart index ignored");
            return Ok(None);
        }

        let removed = cart.remove(index);

        self.commit(&cart)?;
        info!(name = %removed.name, "medication removed from cart");

        Ok(Some(removed))
    }

    fn replace_cart(&self, items: Vec<CartItem>) -> Result<(), CartsServiceError> {
        items.iter().try_for_each(CartItem::validate)?;

        let mut names = FxHashSet::default();
        let cart: Vec<CartItem> = items
            .into_iter()
            .filter(|item| names.insert(item.name.clone()))
            .map(|mut item| {
                item.quantity = item.effective_quantity();
                item
            })
            .collect();

        self.commit(&cart)?;
        info!(cart_size = cart.len(), "cart replaced");

        Ok(())
    }

    fn clear(&self) -> Result<(), CartsServiceError> {
        self.replace_cart(Vec::new())
    }
}

/// Cart operations. Every successful write publishes [`Topic::CartChanged`].
#[automock]
pub trait CartsService {
    /// Current cart contents.
    fn items(&self) -> Vec<CartItem>;

    /// Append every candidate whose name is not already in the cart.
    ///
    /// Existing entries win: their quantity and details are left untouched.
    /// Returns how many candidates were inserted.
    ///
    /// # Errors
    ///
    /// Fails without touching the cart when any candidate has a blank name or
    /// a negative price, or when the write fails.
    fn add_medications(&self, candidates: Vec<CartItem>) -> Result<usize, CartsServiceError>;

    /// Adjust the quantity at `index` by `delta`, never going below one.
    ///
    /// An out-of-range index is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn update_quantity(&self, index: usize, delta: i64) -> Result<(), CartsServiceError>;

    /// Remove the item at `index`, returning it. Out of range is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn remove_item(&self, index: usize) -> Result<Option<CartItem>, CartsServiceError>;

    /// Replace the whole cart. Later duplicates of a name are dropped.
    ///
    /// # Errors
    ///
    /// Fails on invalid items or when the write fails.
    fn replace_cart(&self, items: Vec<CartItem>) -> Result<(), CartsServiceError>;

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn clear(&self) -> Result<(), CartsServiceError>;
}
