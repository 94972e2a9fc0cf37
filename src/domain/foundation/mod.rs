//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, billing-period value object, error taxonomy,
//! and state-machine trait that form the vocabulary of the engine.

mod errors;
mod ids;
mod period;
mod state_machine;

pub use errors::LedgerError;
pub use ids::{CategoryId, OperatorId, OrderId, PayoutId, RateId, StoreId, TransactionId};
pub use period::BillingPeriod;
pub use state_machine::StateMachine;
