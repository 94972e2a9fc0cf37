//! Error taxonomy for the commission engine.
//!
//! Every fallible operation in the engine surfaces one of these variants.
//! Validation, not-found, conflict, and authentication errors are reported
//! synchronously to the caller and never retried by the engine itself;
//! gateway errors are surfaced as 5xx so the upstream gateway retries.

use thiserror::Error;

/// Engine-wide error type.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Malformed input or an invalid value (bad period string, zero amount,
    /// invalid rate bounds, nothing to pay).
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// A payout status change that the lifecycle table does not allow.
    #[error("invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness violation or a mutation blocked by dependents.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or invalid webhook signature. Rejected before parsing.
    #[error("webhook authentication failed: {0}")]
    Authentication(String),

    /// Timeout or unexpected response from the external payment gateway.
    #[error("payment gateway error: {0}")]
    Gateway(String),

    /// Backing datastore failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a not-found error for an entity.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        LedgerError::Conflict(reason.into())
    }

    /// Creates an invalid-transition error from display representations.
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        LedgerError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// True for errors the upstream gateway is expected to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Gateway(_) | LedgerError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_field_and_reason() {
        let err = LedgerError::validation("period", "expected YYYY-MM");
        assert_eq!(
            format!("{}", err),
            "validation failed for 'period': expected YYYY-MM"
        );
    }

    #[test]
    fn invalid_transition_displays_both_states() {
        let err = LedgerError::invalid_transition("completed", "pending");
        assert_eq!(
            format!("{}", err),
            "invalid status transition from 'completed' to 'pending'"
        );
    }

    #[test]
    fn not_found_displays_entity_and_id() {
        let err = LedgerError::not_found("payout", "abc");
        assert_eq!(format!("{}", err), "payout not found: abc");
    }

    #[test]
    fn retryable_classification() {
        assert!(LedgerError::Gateway("timeout".into()).is_retryable());
        assert!(LedgerError::Storage("pool closed".into()).is_retryable());
        assert!(!LedgerError::conflict("duplicate payout").is_retryable());
        assert!(!LedgerError::Authentication("missing header".into()).is_retryable());
    }
}
