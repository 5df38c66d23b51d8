//! Reminders service.
//!
//! Same load → validate → save → publish cycle as the cart, against the
//! reminders key. Operations on an unknown id are silent no-ops and neither
//! write nor publish.

use std::{fmt, rc::Rc};

use mockall::automock;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    bus::{ChangeBus, Topic},
    domain::{
        carts::models::CartItem,
        reminders::{
            errors::RemindersServiceError,
            models::{NewReminder, Reminder, ReminderUpdate, ReminderUuid},
            repository::ReminderRepository,
            schedule::ReminderTimes,
        },
        validation::require,
    },
};

/// [`RemindersService`] over a [`ReminderRepository`], announcing changes on the bus.
#[derive(Clone)]
pub struct StoredRemindersService {
    repository: Rc<dyn ReminderRepository>,
    bus: ChangeBus,
}

impl fmt::Debug for StoredRemindersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredRemindersService")
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl StoredRemindersService {
    /// Service that publishes [`Topic::RemindersChanged`] on `bus` after each write.
    #[must_use]
    pub fn new(repository: Rc<dyn ReminderRepository>, bus: ChangeBus) -> Self {
        Self { repository, bus }
    }

    fn commit(&self, reminders: &[Reminder]) -> Result<(), RemindersServiceError> {
        self.repository.save(reminders)?;
        self.bus.publish(Topic::RemindersChanged);

        Ok(())
    }
}

impl RemindersService for StoredRemindersService {
    fn reminders(&self) -> Vec<Reminder> {
        self.repository.load()
    }

    fn create_from_cart(&self, cart: &[CartItem]) -> Result<usize, RemindersServiceError> {
        let mut reminders = self.repository.load();
        let mut medications: FxHashSet<String> = reminders
            .iter()
            .map(|reminder| reminder.medication.clone())
            .collect();
        let before = reminders.len();

        for item in cart {
            if require("medication", &item.name).is_err() {
                debug!("cart item without a medication name, skipping");
                continue;
            }

            if !medications.insert(item.name.clone()) {
                debug!(medication = %item.name, "reminder already exists, skipping");
                continue;
            }

            reminders.push(Reminder {
                id: ReminderUuid::new(),
                medication: item.name.clone(),
                dosage: item.dosage.clone(),
                frequency: item.frequency.clone(),
                times: ReminderTimes::twice_daily(),
                enabled: true,
            });
        }

        let created = reminders.len() - before;

        if created > 0 {
            self.commit(&reminders)?;
            info!(created, total = reminders.len(), "reminders created from cart");
        }

        Ok(created)
    }

    fn create(&self, new: NewReminder) -> Result<Reminder, RemindersServiceError> {
        new.validate()?;

        let mut reminders = self.repository.load();
        let reminder = Reminder::from_new(new);

        reminders.push(reminder.clone());
        self.commit(&reminders)?;

        info!(id = %reminder.id, medication = %reminder.medication, "reminder created");

        Ok(reminder)
    }

    fn toggle(&self, id: ReminderUuid) -> Result<Option<Reminder>, RemindersServiceError> {
        let mut reminders = self.repository.load();

        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
            debug!(%id, "toggle of unknown reminder ignored");
            return Ok(None);
        };

        reminder.enabled = !reminder.enabled;
        let toggled = reminder.clone();

        self.commit(&reminders)?;
        debug!(%id, enabled = toggled.enabled, "reminder toggled");

        Ok(Some(toggled))
    }

    fn update(
        &self,
        id: ReminderUuid,
        update: ReminderUpdate,
    ) -> Result<Option<Reminder>, RemindersServiceError> {
        let times = update.validate()?;

        let mut reminders = self.repository.load();

        let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
            debug!(%id, "update of unknown reminder ignored");
            return Ok(None);
        };

        reminder.apply(update, times);
        let updated = reminder.clone();

        self.commit(&reminders)?;
        debug!(%id, "reminder updated");

        Ok(Some(updated))
    }

    fn delete(&self, id: ReminderUuid) -> Result<Option<Reminder>, RemindersServiceError> {
        let mut reminders = self.repository.load();

        let Some(position) = reminders.iter().position(|r| r.id == id) else {
            debug!(%id, "delete of unknown reminder ignored");
            return Ok(None);
        };

        let removed = reminders.remove(position);

        self.commit(&reminders)?;
        info!(%id, medication = %removed.medication, "reminder deleted");

        Ok(Some(removed))
    }
}

/// Reminder operations. Every successful write publishes [`Topic::RemindersChanged`].
#[automock]
pub trait RemindersService {
    /// Current reminder list.
    fn reminders(&self) -> Vec<Reminder>;

    /// Create a twice-daily reminder for every cart item whose medication has
    /// no reminder yet. Items with a blank name are skipped. Returns how many
    /// were created.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn create_from_cart(&self, cart: &[CartItem]) -> Result<usize, RemindersServiceError>;

    /// Create an enabled reminder from form input.
    ///
    /// # Errors
    ///
    /// Fails without touching the list when medication or dosage is blank, or
    /// when the write fails.
    fn create(&self, new: NewReminder) -> Result<Reminder, RemindersServiceError>;

    /// Flip `enabled`. Unknown ids return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn toggle(&self, id: ReminderUuid) -> Result<Option<Reminder>, RemindersServiceError>;

    /// Apply a partial update. Unknown ids return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Fails when a set field is blank, the time list is empty, or the write fails.
    fn update(
        &self,
        id: ReminderUuid,
        update: ReminderUpdate,
    ) -> Result<Option<Reminder>, RemindersServiceError>;

    /// Remove a reminder, returning it. Unknown ids return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    fn delete(&self, id: ReminderUuid) -> Result<Option<Reminder>, RemindersServiceError>;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            ValidationError,
            reminders::{repository::MockReminderRepository, schedule::ReminderTime},
        },
        storage::StorageError,
        test::TestContext,
    };

    use super::*;

    fn cart_item(name: &str, dosage: &str) -> CartItem {
        CartItem {
            name: name.to_string(),
            dosage: dosage.to_string(),
            frequency: "Daily".to_string(),
            duration: "30 days".to_string(),
            price: Decimal::from(5),
            quantity: 1,
        }
    }

    fn new_reminder(medication: &str, dosage: &str) -> NewReminder {
        NewReminder {
            medication: medication.to_string(),
            dosage: dosage.to_string(),
            ..NewReminder::default()
        }
    }

    fn publish_counter(ctx: &TestContext) -> (Rc<Cell<usize>>, crate::bus::Subscription) {
        let published = Rc::new(Cell::new(0));
        let counter = Rc::clone(&published);
        let subscription = ctx.bus.subscribe(Topic::RemindersChanged, move |_| {
            counter.set(counter.get() + 1);
        });

        (published, subscription)
    }

    #[test]
    fn create_from_cart_scenario() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx.reminders.create_from_cart(&[cart_item("B", "5mg")])?;
        let reminders = ctx.reminders.reminders();

        assert_eq!(created, 1);
        assert_eq!(reminders.len(), 1);

        let reminder = reminders.first().ok_or("missing reminder")?;

        assert_eq!(reminder.medication, "B");
        assert_eq!(reminder.dosage, "5mg");
        assert_eq!(reminder.frequency, "Daily");
        assert_eq!(
            reminder.times.as_slice(),
            &[ReminderTime::morning(), ReminderTime::evening()]
        );
        assert!(reminder.enabled, "new reminders start enabled");

        Ok(())
    }

    #[test]
    fn create_from_cart_is_idempotent() -> TestResult {
        let ctx = TestContext::new();
        let cart = vec![cart_item("A", "1mg"), cart_item("B", "2mg")];

        ctx.reminders.create_from_cart(&cart)?;
        let first = ctx.reminders.reminders();

        let (published, _subscription) = publish_counter(&ctx);
        let created = ctx.reminders.create_from_cart(&cart)?;

        assert_eq!(created, 0);
        assert_eq!(ctx.reminders.reminders(), first);
        assert_eq!(published.get(), 0, "no-op must not publish");

        Ok(())
    }

    #[test]
    fn create_from_cart_dedups_within_batch() -> TestResult {
        let ctx = TestContext::new();

        let created = ctx
            .reminders
            .create_from_cart(&[cart_item("A", "1mg"), cart_item("A", "2mg")])?;

        assert_eq!(created, 1);
        assert_eq!(
            ctx.reminders.reminders().first().map(|r| r.dosage.clone()),
            Some("1mg".to_string())
        );

        Ok(())
    }

    #[test]
    fn create_from_cart_skips_unnamed_items() -> TestResult {
        let ctx = TestContext::new();
        let (published, _subscription) = publish_counter(&ctx);

        let created = ctx
            .reminders
            .create_from_cart(&[cart_item("", "1mg"), cart_item("  ", "2mg")])?;

        assert_eq!(created, 0);
        assert!(ctx.reminders.reminders().is_empty());
        assert_eq!(published.get(), 0, "no-op must not publish");

        let created = ctx
            .reminders
            .create_from_cart(&[cart_item(" ", "1mg"), cart_item("B", "2mg")])?;
        let medications: Vec<String> = ctx
            .reminders
            .reminders()
            .into_iter()
            .map(|r| r.medication)
            .collect();

        assert_eq!(created, 1);
        assert_eq!(medications, vec!["B"]);

        Ok(())
    }

    #[test]
    fn create_from_cart_skips_existing_medication() -> TestResult {
        let ctx = TestContext::new();
        ctx.reminders.create(new_reminder("A", "custom"))?;

        let created = ctx
            .reminders
            .create_from_cart(&[cart_item("A", "1mg"), cart_item("B", "2mg")])?;

        let medications: Vec<String> = ctx
            .reminders
            .reminders()
            .into_iter()
            .map(|r| r.medication)
            .collect();

        assert_eq!(created, 1);
        assert_eq!(medications, vec!["A", "B"]);

        Ok(())
    }

    #[test]
    fn create_assigns_fresh_ids() -> TestResult {
        let ctx = TestContext::new();

        let first = ctx.reminders.create(new_reminder("A", "1mg"))?;
        let second = ctx.reminders.create(new_reminder("A", "1mg"))?;

        assert_ne!(first.id, second.id);
        assert!(first.enabled && second.enabled, "created reminders are enabled");
        assert_eq!(ctx.reminders.reminders().len(), 2);

        Ok(())
    }

    #[test]
    fn create_with_empty_dosage_leaves_store_unchanged() -> TestResult {
        let ctx = TestContext::new();
        ctx.reminders.create(new_reminder("A", "1mg"))?;
        let before = ctx.reminders.reminders();
        let (published, _subscription) = publish_counter(&ctx);

        let result = ctx.reminders.create(new_reminder("B", ""));

        assert!(
            matches!(
                result,
                Err(RemindersServiceError::Validation(ValidationError::MissingField("dosage")))
            ),
            "expected missing dosage, got {result:?}"
        );
        assert_eq!(ctx.reminders.reminders(), before);
        assert_eq!(published.get(), 0);

        Ok(())
    }

    #[test]
    fn toggle_flips_enabled() -> TestResult {
        let ctx = TestContext::new();
        let reminder = ctx.reminders.create(new_reminder("A", "1mg"))?;

        let toggled = ctx.reminders.toggle(reminder.id)?;

        assert_eq!(toggled.map(|r| r.enabled), Some(false));

        ctx.reminders.toggle(reminder.id)?;

        assert_eq!(
            ctx.reminders.reminders().first().map(|r| r.enabled),
            Some(true)
        );

        Ok(())
    }

    #[test]
    fn unknown_id_is_silent_no_op() -> TestResult {
        let ctx = TestContext::new();
        ctx.reminders.create(new_reminder("A", "1mg"))?;
        let before = ctx.reminders.reminders();
        let (published, _subscription) = publish_counter(&ctx);

        let missing = ReminderUuid::new();

        assert!(ctx.reminders.toggle(missing)?.is_none());
        assert!(
            ctx.reminders
                .update(missing, ReminderUpdate::default())?
                .is_none()
        );
        assert!(ctx.reminders.delete(missing)?.is_none());

        assert_eq!(ctx.reminders.reminders(), before);
        assert_eq!(published.get(), 0);

        Ok(())
    }

    #[test]
    fn update_merges_set_fields() -> TestResult {
        let ctx = TestContext::new();
        let reminder = ctx.reminders.create(new_reminder("A", "1mg"))?;

        let updated = ctx
            .reminders
            .update(
                reminder.id,
                ReminderUpdate {
                    dosage: Some("2mg".to_string()),
                    times: Some(vec![ReminderTime::morning(), ReminderTime::noon()]),
                    ..ReminderUpdate::default()
                },
            )?
            .ok_or("reminder should exist")?;

        assert_eq!(updated.medication, "A");
        assert_eq!(updated.dosage, "2mg");
        assert_eq!(updated.times.to_string(), "09:00, 12:00");
        assert_eq!(ctx.reminders.reminders(), vec![updated]);

        Ok(())
    }

    #[test]
    fn update_rejects_blank_fields_and_empty_schedule() -> TestResult {
        let ctx = TestContext::new();
        let reminder = ctx.reminders.create(new_reminder("A", "1mg"))?;

        let blank = ctx.reminders.update(
            reminder.id,
            ReminderUpdate {
                medication: Some(" ".to_string()),
                ..ReminderUpdate::default()
            },
        );
        let empty = ctx.reminders.update(
            reminder.id,
            ReminderUpdate {
                times: Some(Vec::new()),
                ..ReminderUpdate::default()
            },
        );

        assert!(
            matches!(blank, Err(RemindersServiceError::Validation(_))),
            "expected validation error, got {blank:?}"
        );
        assert!(
            matches!(
                empty,
                Err(RemindersServiceError::Validation(ValidationError::EmptySchedule))
            ),
            "expected empty schedule error, got {empty:?}"
        );
        assert_eq!(ctx.reminders.reminders(), vec![reminder]);

        Ok(())
    }

    #[test]
    fn delete_removes_reminder() -> TestResult {
        let ctx = TestContext::new();
        let first = ctx.reminders.create(new_reminder("A", "1mg"))?;
        let second = ctx.reminders.create(new_reminder("B", "2mg"))?;

        let removed = ctx.reminders.delete(first.id)?;

        assert_eq!(removed.map(|r| r.id), Some(first.id));
        assert_eq!(ctx.reminders.reminders(), vec![second]);

        Ok(())
    }

    #[test]
    fn failed_save_does_not_publish() {
        let mut repository = MockReminderRepository::new();
        repository.expect_load().returning(Vec::new);
        repository
            .expect_save()
            .returning(|_| Err(StorageError::Unavailable("disabled".to_string())));

        let bus = ChangeBus::new();
        let published = Rc::new(Cell::new(false));
        let flag = Rc::clone(&published);
        let _subscription = bus.subscribe(Topic::RemindersChanged, move |_| flag.set(true));

        let service = StoredRemindersService::new(Rc::new(repository), bus);

        let result = service.create(new_reminder("A", "1mg"));

        assert!(
            matches!(result, Err(RemindersServiceError::Storage(_))),
            "expected storage failure, got {result:?}"
        );
        assert!(!published.get(), "nothing may be published after a failed write");
    }

    #[test]
    fn invalid_create_never_loads_or_saves() {
        let mut repository = MockReminderRepository::new();
        repository.expect_load().never();
        repository.expect_save().never();

        let service = StoredRemindersService::new(Rc::new(repository), ChangeBus::new());

        assert!(
            service.create(new_reminder("", "1mg")).is_err(),
            "blank medication must be rejected"
        );
    }
}
