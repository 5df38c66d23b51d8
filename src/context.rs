//! App Context

use std::{path::Path, rc::Rc};

use thiserror::Error;

use crate::{
    bus::{ChangeBus, Topic},
    counters::BadgeCounts,
    domain::{
        carts::{CartsService, StoredCartRepository, StoredCartsService, models::CartItem},
        reminders::{
            RemindersService, StoredReminderRepository, StoredRemindersService, models::Reminder,
        },
    },
    storage::{FileStorage, JsonStore, KeyValueStorage, StorageError},
    surfaces::{CollectionView, NavigationBadges},
};

/// Errors raised while building an [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The data directory could not be created.
    #[error("failed to open data directory")]
    Storage(#[source] StorageError),
}

/// Storage, bus and services for one "tab".
#[derive(Clone)]
pub struct AppContext {
    /// Change notifications for this tab.
    pub bus: ChangeBus,

    /// Cart operations.
    pub carts: Rc<dyn CartsService>,

    /// Reminder operations.
    pub reminders: Rc<dyn RemindersService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Wire services over an existing storage host.
    pub fn with_storage(storage: Rc<dyn KeyValueStorage>) -> Self {
        let bus = ChangeBus::new();
        let store = JsonStore::new(storage);

        Self {
            carts: Rc::new(StoredCartsService::new(
                Rc::new(StoredCartRepository::new(store.clone())),
                bus.clone(),
            )),
            reminders: Rc::new(StoredRemindersService::new(
                Rc::new(StoredReminderRepository::new(store)),
                bus.clone(),
            )),
            bus,
        }
    }

    /// Build application context over a data directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn from_data_dir(dir: &Path) -> Result<(Self, FileStorage), AppInitError> {
        let storage = FileStorage::open(dir).map_err(AppInitError::Storage)?;

        Ok((Self::with_storage(Rc::new(storage.clone())), storage))
    }

    /// Current badge counts, read straight from storage.
    pub fn badge_counts(&self) -> BadgeCounts {
        BadgeCounts::compute(&self.carts.items(), &self.reminders.reminders())
    }

    /// Mount a cart screen view.
    pub fn mount_cart_view(&self) -> CollectionView<CartItem> {
        let carts = Rc::clone(&self.carts);

        CollectionView::mount(&self.bus, Topic::CartChanged, move || carts.items())
    }

    /// Mount a reminders screen view.
    pub fn mount_reminders_view(&self) -> CollectionView<Reminder> {
        let reminders = Rc::clone(&self.reminders);

        CollectionView::mount(&self.bus, Topic::RemindersChanged, move || {
            reminders.reminders()
        })
    }

    /// Mount the navigation header badges.
    pub fn mount_badges(&self) -> NavigationBadges {
        let carts = Rc::clone(&self.carts);
        let reminders = Rc::clone(&self.reminders);

        NavigationBadges::mount(&self.bus, move || {
            BadgeCounts::compute(&carts.items(), &reminders.reminders())
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{domain::reminders::models::NewReminder, test::TestContext};

    use super::*;

    fn item(name: &str) -> CartItem {
        CartItem {
            name: name.to_string(),
            dosage: "5mg".to_string(),
            frequency: "Daily".to_string(),
            duration: "7 days".to_string(),
            price: Decimal::new(499, 2),
            quantity: 1,
        }
    }

    #[test]
    fn views_follow_mutations_from_other_surfaces() -> TestResult {
        let ctx = TestContext::new();

        let cart_view = ctx.app.mount_cart_view();
        let reminders_view = ctx.app.mount_reminders_view();
        let badges = ctx.app.mount_badges();

        ctx.carts.add_medications(vec![item("A"), item("B")])?;
        ctx.reminders.create_from_cart(&ctx.carts.items())?;
        ctx.reminders.create(NewReminder {
            medication: "C".to_string(),
            dosage: "1 tablet".to_string(),
            ..NewReminder::default()
        })?;

        let first = reminders_view
            .records()
            .first()
            .map(|r| r.id)
            .ok_or("missing reminder")?;
        ctx.reminders.toggle(first)?;

        assert_eq!(cart_view.len(), 2);
        assert_eq!(reminders_view.len(), 3);
        assert_eq!(
            badges.counts(),
            BadgeCounts {
                cart: 2,
                reminders: 2
            }
        );
        assert_eq!(badges.counts(), ctx.app.badge_counts());

        Ok(())
    }

    #[test]
    fn corrupt_collections_read_as_empty() -> TestResult {
        let ctx = TestContext::new();
        ctx.storage.set_item(crate::storage::CART_KEY, "{broken")?;
        ctx.storage
            .set_item(crate::storage::REMINDERS_KEY, r#"[{"id":1}]"#)?;

        assert!(ctx.carts.items().is_empty());
        assert!(ctx.reminders.reminders().is_empty());
        assert_eq!(ctx.app.badge_counts(), BadgeCounts::default());

        ctx.carts.add_medications(vec![item("A")])?;

        assert_eq!(ctx.carts.items().len(), 1);

        Ok(())
    }

    #[test]
    fn unmounted_views_release_subscriptions() {
        let ctx = TestContext::new();

        {
            let _cart = ctx.app.mount_cart_view();
            let _badges = ctx.app.mount_badges();

            assert_eq!(ctx.bus.subscriber_count(), 2);
        }

        assert_eq!(ctx.bus.subscriber_count(), 0);
    }

    #[test]
    fn from_data_dir_shares_storage_on_disk() -> TestResult {
        let dir = tempfile::tempdir()?;

        let (tab_a, _) = AppContext::from_data_dir(dir.path())?;
        let (tab_b, _) = AppContext::from_data_dir(dir.path())?;

        tab_a.carts.add_medications(vec![item("A")])?;

        assert_eq!(tab_b.carts.items(), tab_a.carts.items());

        Ok(())
    }
}
