//! Derived badge counters.

use std::fmt;

use crate::domain::{carts::models::CartItem, reminders::models::Reminder};

/// Number of distinct medications in the cart.
pub fn cart_count(cart: &[CartItem]) -> usize {
    cart.len()
}

/// Number of enabled reminders.
pub fn active_reminder_count(reminders: &[Reminder]) -> usize {
    reminders.iter().filter(|reminder| reminder.enabled).count()
}

/// Counts shown on the navigation header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeCounts {
    /// Cart badge.
    pub cart: usize,

    /// Active reminders badge.
    pub reminders: usize,
}

impl BadgeCounts {
    /// Derive both counts from the stored collections.
    pub fn compute(cart: &[CartItem], reminders: &[Reminder]) -> Self {
        Self {
            cart: cart_count(cart),
            reminders: active_reminder_count(reminders),
        }
    }
}

impl fmt::Display for BadgeCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cart: {}  reminders: {}", self.cart, self.reminders)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::reminders::models::NewReminder;

    use super::*;

    fn reminder(enabled: bool) -> Reminder {
        let mut reminder = Reminder::from_new(NewReminder {
            medication: "A".to_string(),
            dosage: "1mg".to_string(),
            ..NewReminder::default()
        });
        reminder.enabled = enabled;
        reminder
    }

    #[test]
    fn cart_count_ignores_quantity() {
        let cart = vec![CartItem {
            name: "A".to_string(),
            dosage: String::new(),
            frequency: String::new(),
            duration: String::new(),
            price: Decimal::ONE,
            quantity: 7,
        }];

        assert_eq!(cart_count(&cart), 1);
    }

    #[test]
    fn only_enabled_reminders_are_active() {
        let reminders = vec![reminder(true), reminder(false), reminder(true)];

        assert_eq!(active_reminder_count(&reminders), 2);
        assert_eq!(
            BadgeCounts::compute(&[], &reminders),
            BadgeCounts {
                cart: 0,
                reminders: 2
            }
        );
    }
}
