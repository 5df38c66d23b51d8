//! Validation shared by the domain services.

use thiserror::Error;

/// User-supplied data was rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A cart item carried a negative price.
    #[error("price of `{name}` must not be negative")]
    NegativePrice {
        /// Medication name of the offending item.
        name: String,
    },

    /// A reminder update tried to clear every scheduled time.
    #[error("a reminder needs at least one time")]
    EmptySchedule,
}

/// Reject `value` when it is empty or whitespace.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank_values() {
        assert_eq!(
            require("dosage", "   "),
            Err(ValidationError::MissingField("dosage"))
        );
        assert_eq!(
            require("dosage", ""),
            Err(ValidationError::MissingField("dosage"))
        );
    }

    #[test]
    fn require_accepts_text() {
        assert_eq!(require("dosage", "5mg"), Ok(()));
    }

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::MissingField("medication").to_string(),
            "medication is required"
        );
    }
}
