//! ReconciliationQueue port - Compensating-action log for failed cascades.
//!
//! When a payout reaches `completed` but the ledger cascade fails, the payout
//! is not rolled back (the settlement already happened upstream). Instead the
//! inconsistency is recorded here so an out-of-band process can replay the
//! cascade; the "completed but not cascaded" state is tracked, never silent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::foundation::{BillingPeriod, LedgerError, PayoutId, StoreId};

/// One pending cascade replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationTask {
    pub id: Uuid,
    pub payout_id: PayoutId,
    pub store_id: StoreId,
    pub period: BillingPeriod,
    /// The error that prevented the cascade.
    pub error: String,
    pub enqueued_at: DateTime<Utc>,
}

impl ReconciliationTask {
    pub fn new(
        payout_id: PayoutId,
        store_id: StoreId,
        period: BillingPeriod,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payout_id,
            store_id,
            period,
            error: error.into(),
            enqueued_at: Utc::now(),
        }
    }
}

/// Port for the compensating-action log.
#[async_trait]
pub trait ReconciliationQueue: Send + Sync {
    async fn enqueue(&self, task: ReconciliationTask) -> Result<(), LedgerError>;

    /// Tasks awaiting replay, oldest first.
    async fn list_pending(&self) -> Result<Vec<ReconciliationTask>, LedgerError>;

    /// Removes a task after a successful replay.
    async fn mark_resolved(&self, id: &Uuid) -> Result<(), LedgerError>;
}
