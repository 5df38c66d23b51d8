//! Medicart
//!
//! A medication cart and dosage reminders kept in one persistent key-value
//! store, with every mounted surface kept current through a synchronous change
//! bus.

pub mod bus;
pub mod context;
pub mod counters;
pub mod domain;
pub mod prescriptions;
pub mod storage;
pub mod surfaces;
pub mod uuids;

#[cfg(test)]
mod test;
