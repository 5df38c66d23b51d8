//! Reminders Repository

use mockall::automock;

use crate::{
    domain::reminders::models::Reminder,
    storage::{JsonStore, REMINDERS_KEY, StorageError},
};

/// Load/save access to the persisted reminder list.
#[automock]
pub trait ReminderRepository {
    /// Current reminders; empty when absent or corrupt.
    fn load(&self) -> Vec<Reminder>;

    /// Overwrite the reminder list.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write fails.
    fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError>;
}

/// [`ReminderRepository`] over the `medicationReminders` storage key.
#[derive(Debug, Clone)]
pub struct StoredReminderRepository {
    store: JsonStore,
}

impl StoredReminderRepository {
    /// Repository over the reminders key of `store`.
    #[must_use]
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }
}

impl ReminderRepository for StoredReminderRepository {
    fn load(&self) -> Vec<Reminder> {
        self.store.load(REMINDERS_KEY)
    }

    fn save(&self, reminders: &[Reminder]) -> Result<(), StorageError> {
        self.store.save(REMINDERS_KEY, reminders)
    }
}
