//! Carts

pub mod errors;
pub mod models;
mod repository;
pub mod service;
pub mod totals;

pub use errors::CartsServiceError;
pub use repository::{CartRepository, MockCartRepository, StoredCartRepository};
pub use service::*;
pub use totals::{CartTotals, TAX_RATE, compute_totals};
