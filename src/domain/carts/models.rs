//! Cart Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::validation::{ValidationError, require};

/// A medication held in the cart.
///
/// `name` is the identity of an item within one cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Medication name.
    pub name: String,

    /// Strength, e.g. `500mg`.
    #[serde(default)]
    pub dosage: String,

    /// Human-readable instruction, never parsed.
    #[serde(default)]
    pub frequency: String,

    /// Course length as written on the prescription.
    #[serde(default)]
    pub duration: String,

    /// Unit price in USD.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Units ordered.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    /// Quantity used for pricing; a stored zero counts as one.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// `price × quantity`.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.effective_quantity())
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require("medication name", &self.name)?;

        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice {
                name: self.name.clone(),
            });
        }

        Ok(())
    }
}
