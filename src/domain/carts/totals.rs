//! Cart Totals

use std::fmt;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};

use super::models::CartItem;

/// Estimated sales tax applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Price summary of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    /// Σ price × quantity.
    pub subtotal: Decimal,
    /// `subtotal × TAX_RATE`.
    pub tax: Decimal,
    /// `subtotal + tax`.
    pub total: Decimal,
}

/// Compute cart totals. Exact decimal arithmetic, so the result is linear in
/// every item's quantity.
pub fn compute_totals(items: &[CartItem]) -> CartTotals {
    let subtotal = items.iter().map(CartItem::line_total).sum::<Decimal>();
    let tax = subtotal * TAX_RATE;

    CartTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Render an amount as US dollars, rounded to cents.
pub fn format_usd(amount: Decimal) -> String {
    match (amount * Decimal::ONE_HUNDRED).round_dp(0).to_i64() {
        Some(minor) => Money::from_minor(minor, iso::USD).to_string(),
        None => format!("${}", amount.round_dp(2)),
    }
}

impl fmt::Display for CartTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "subtotal {} / tax {} / total {}",
            format_usd(self.subtotal),
            format_usd(self.tax),
            format_usd(self.total)
        )
    }
}
