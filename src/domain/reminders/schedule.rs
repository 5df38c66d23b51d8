//! Reminder schedules.
//!
//! A schedule is a non-empty, ordered list of 24-hour `HH:MM` times. The
//! non-empty rule is enforced by construction and on deserialization, so a
//! [`ReminderTimes`] value can never be observed without at least one entry.

use std::{fmt, str::FromStr};

use jiff::civil::Time;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or editing a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderTimeError {
    /// The text is not a valid `HH:MM` time.
    #[error("`{0}` is not a valid HH:MM time")]
    Invalid(String),

    /// A schedule must keep at least one time.
    #[error("a reminder needs at least one time")]
    Empty,

    /// The last remaining time cannot be removed.
    #[error("cannot remove the last reminder time")]
    LastTime,

    /// No time exists at the given position.
    #[error("no reminder time at position {0}")]
    OutOfRange(usize),
}

/// A time of day, serialized as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime(Time);

impl ReminderTime {
    /// Build a time from an hour and minute.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderTimeError::Invalid`] when either component is out of range.
    pub fn new(hour: i8, minute: i8) -> Result<Self, ReminderTimeError> {
        Time::new(hour, minute, 0, 0)
            .map(Self)
            .map_err(|_err| ReminderTimeError::Invalid(format!("{hour:02}:{minute:02}")))
    }

    /// 09:00, the default morning dose.
    pub fn morning() -> Self {
        Self(Time::constant(9, 0, 0, 0))
    }

    /// 12:00, the default for an added time slot.
    pub fn noon() -> Self {
        Self(Time::constant(12, 0, 0, 0))
    }

    /// 21:00, the default evening dose.
    pub fn evening() -> Self {
        Self(Time::constant(21, 0, 0, 0))
    }

    /// Hour, 0 to 23.
    pub fn hour(self) -> i8 {
        self.0.hour()
    }

    /// Minute, 0 to 59.
    pub fn minute(self) -> i8 {
        self.0.minute()
    }
}

impl FromStr for ReminderTime {
    type Err = ReminderTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReminderTimeError::Invalid(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;

        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }

        let hour = hour.parse::<i8>().map_err(|_err| invalid())?;
        let minute = minute.parse::<i8>().map_err(|_err| invalid())?;

        Time::new(hour, minute, 0, 0)
            .map(Self)
            .map_err(|_err| invalid())
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = ReminderTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Non-empty, ordered list of reminder times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ReminderTime>", into = "Vec<ReminderTime>")]
pub struct ReminderTimes(Vec<ReminderTime>);

impl ReminderTimes {
    /// A schedule with one time.
    pub fn single(time: ReminderTime) -> Self {
        Self(vec![time])
    }

    /// 09:00 and 21:00, the schedule given to reminders created from the cart.
    pub fn twice_daily() -> Self {
        Self(vec![ReminderTime::morning(), ReminderTime::evening()])
    }

    /// Parse a list of `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or any entry is not a valid time.
    pub fn parse<S: AsRef<str>>(times: &[S]) -> Result<Self, ReminderTimeError> {
        times
            .iter()
            .map(|time| time.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .and_then(Self::try_from)
    }

    /// Times in schedule order.
    pub fn as_slice(&self) -> &[ReminderTime] {
        &self.0
    }

    /// Iterate the times in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = &ReminderTime> {
        self.0.iter()
    }

    /// Append a time slot.
    pub fn add_time(&mut self, time: ReminderTime) {
        self.0.push(time);
    }

    /// Append a 12:00 slot, as the reminder form does.
    pub fn add_default_time(&mut self) {
        self.add_time(ReminderTime::noon());
    }

    /// Replace the time at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderTimeError::OutOfRange`] for an unknown position.
    pub fn set_time(&mut self, index: usize, time: ReminderTime) -> Result<(), ReminderTimeError> {
        let slot = self
            .0
            .get_mut(index)
            .ok_or(ReminderTimeError::OutOfRange(index))?;
        *slot = time;

        Ok(())
    }

    /// Remove the time at `index`, keeping at least one.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderTimeError::LastTime`] when only one time is left and
    /// [`ReminderTimeError::OutOfRange`] for an unknown position.
    pub fn remove_time(&mut self, index: usize) -> Result<ReminderTime, ReminderTimeError> {
        if index >= self.0.len() {
            return Err(ReminderTimeError::OutOfRange(index));
        }

        if self.0.len() == 1 {
            return Err(ReminderTimeError::LastTime);
        }

        Ok(self.0.remove(index))
    }
}

impl Default for ReminderTimes {
    fn default() -> Self {
        Self::single(ReminderTime::morning())
    }
}

impl<'a> IntoIterator for &'a ReminderTimes {
    type Item = &'a ReminderTime;
    type IntoIter = std::slice::Iter<'a, ReminderTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<Vec<ReminderTime>> for ReminderTimes {
    type Error = ReminderTimeError;

    fn try_from(value: Vec<ReminderTime>) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ReminderTimeError::Empty);
        }

        Ok(Self(value))
    }
}

impl From<ReminderTimes> for Vec<ReminderTime> {
    fn from(value: ReminderTimes) -> Self {
        value.0
    }
}

impl fmt::Display for ReminderTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for time in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{time}")?;
            first = false;
        }

        Ok(())
    }
}
