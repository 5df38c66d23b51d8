//! Reminders

pub mod errors;
pub mod models;
mod repository;
pub mod schedule;
pub mod service;

pub use errors::RemindersServiceError;
pub use repository::{MockReminderRepository, ReminderRepository, StoredReminderRepository};
pub use schedule::{ReminderTime, ReminderTimeError, ReminderTimes};
pub use service::*;
