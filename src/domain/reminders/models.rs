//! Reminder Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        ValidationError,
        reminders::schedule::{ReminderTime, ReminderTimes},
        validation::require,
    },
    uuids::TypedUuid,
};

/// Reminder identifier.
pub type ReminderUuid = TypedUuid<Reminder>;

/// Default frequency label for a new reminder.
pub const DEFAULT_FREQUENCY: &str = "Daily";

/// A recurring dosage reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Stable identifier.
    pub id: ReminderUuid,

    /// Medication name.
    pub medication: String,

    /// Amount per dose.
    pub dosage: String,

    /// Free-text frequency label.
    pub frequency: String,

    /// Times of day the reminder fires.
    pub times: ReminderTimes,

    /// Disabled reminders are kept but not counted as active.
    pub enabled: bool,
}

/// Fields for a reminder created by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    /// Medication name, required.
    pub medication: String,

    /// Amount per dose, required.
    pub dosage: String,

    /// Free-text frequency label.
    pub frequency: String,

    /// Initial schedule.
    pub times: ReminderTimes,
}

impl Default for NewReminder {
    fn default() -> Self {
        Self {
            medication: String::new(),
            dosage: String::new(),
            frequency: DEFAULT_FREQUENCY.to_string(),
            times: ReminderTimes::single(ReminderTime::morning()),
        }
    }
}

impl NewReminder {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require("medication", &self.medication)?;
        require("dosage", &self.dosage)
    }
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderUpdate {
    /// New medication name.
    pub medication: Option<String>,

    /// New dosage.
    pub dosage: Option<String>,

    /// New frequency label.
    pub frequency: Option<String>,

    /// Replacement schedule; must not be empty.
    pub times: Option<Vec<ReminderTime>>,

    /// New enabled flag.
    pub enabled: Option<bool>,
}

impl ReminderUpdate {
    /// Check whether the update sets nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn validate(&self) -> Result<Option<ReminderTimes>, ValidationError> {
        if let Some(medication) = &self.medication {
            require("medication", medication)?;
        }

        if let Some(dosage) = &self.dosage {
            require("dosage", dosage)?;
        }

        self.times
            .clone()
            .map(|times| {
                ReminderTimes::try_from(times).map_err(|_err| ValidationError::EmptySchedule)
            })
            .transpose()
    }
}

impl Reminder {
    pub(crate) fn from_new(new: NewReminder) -> Self {
        Self {
            id: ReminderUuid::new(),
            medication: new.medication,
            dosage: new.dosage,
            frequency: new.frequency,
            times: new.times,
            enabled: true,
        }
    }

    /// Apply an already validated update.
    pub(crate) fn apply(&mut self, update: ReminderUpdate, times: Option<ReminderTimes>) {
        if let Some(medication) = update.medication {
            self.medication = medication;
        }
        if let Some(dosage) = update.dosage {
            self.dosage = dosage;
        }
        if let Some(frequency) = update.frequency {
            self.frequency = frequency;
        }
        if let Some(times) = times {
            self.times = times;
        }
        if let Some(enabled) = update.enabled {
            self.enabled = enabled;
        }
    }
}
