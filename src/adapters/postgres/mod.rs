//! PostgreSQL implementations of the persistence ports.
//!
//! Uniqueness invariants (one active rate per category, one payout per
//! store/period, one webhook record per idempotency key) are enforced by
//! database constraints; the repositories translate constraint violations
//! into `LedgerError::Conflict` / `InsertOutcome::AlreadyExists`.

mod payout_repository;
mod rate_repository;
mod reconciliation_queue;
mod store_repository;
mod transaction_repository;
mod webhook_event_repository;

pub use payout_repository::PostgresPayoutRepository;
pub use rate_repository::PostgresRateRepository;
pub use reconciliation_queue::PostgresReconciliationQueue;
pub use store_repository::PostgresStoreRepository;
pub use transaction_repository::PostgresTransactionRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;
