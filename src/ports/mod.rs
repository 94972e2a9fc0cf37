//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `RateRepository` - Commission rate storage and active-rate resolution
//! - `TransactionRepository` - Ledger entries, period aggregation, cascade
//! - `PayoutRepository` - Payout batches with (store, period) uniqueness
//! - `StoreRepository` - Seller subscription state
//! - `WebhookEventRepository` - Webhook idempotency records
//! - `ReconciliationQueue` - Compensating-action log for failed cascades
//!
//! ## Integration Ports
//!
//! - `PaymentGateway` - Signature verification and payment lookup
//! - `RateCache` - Injectable cache in front of rate resolution

mod payment_gateway;
mod payout_repository;
mod rate_cache;
mod rate_repository;
mod reconciliation_queue;
mod store_repository;
mod transaction_repository;
mod webhook_event_repository;

pub use payment_gateway::PaymentGateway;
pub use payout_repository::PayoutRepository;
pub use rate_cache::RateCache;
pub use rate_repository::RateRepository;
pub use reconciliation_queue::{ReconciliationQueue, ReconciliationTask};
pub use store_repository::StoreRepository;
pub use transaction_repository::{PeriodTotals, TransactionFilter, TransactionRepository};
pub use webhook_event_repository::{
    InsertOutcome, WebhookEventRecord, WebhookEventRepository, WebhookEventStatus,
};
