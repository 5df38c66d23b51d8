//! Medicart Domain Concerns

pub mod carts;
pub mod reminders;
pub mod validation;

pub use validation::ValidationError;
