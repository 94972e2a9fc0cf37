//! TransactionRepository port - Commission ledger storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::commission::{CommissionTransaction, TransactionStatus};
use crate::domain::foundation::{BillingPeriod, LedgerError, RateId, StoreId};

/// Aggregate of a store's `calculated` commission inside one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodTotals {
    pub total_commission: Decimal,
    pub transaction_count: u32,
}

/// Filter for the reporting read surface.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub store_id: Option<StoreId>,
    pub status: Option<TransactionStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_until: Option<DateTime<Utc>>,
}

/// Port for the commission ledger.
///
/// `mark_paid_for_period` is deliberately the only way any caller can move
/// entries to `paid`; it exists for the payout-completion cascade and nothing
/// else.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, transaction: &CommissionTransaction) -> Result<(), LedgerError>;

    /// Snapshot aggregation of `calculated` entries for a payout.
    async fn sum_calculated(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
    ) -> Result<PeriodTotals, LedgerError>;

    /// Bulk-transitions the store's `calculated` entries inside the period
    /// to `paid`. Entries outside the period, other stores' entries, and
    /// entries already `paid` or `cancelled` are untouched. Returns the
    /// number of entries updated.
    async fn mark_paid_for_period(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
        paid_at: DateTime<Utc>,
    ) -> Result<u64, LedgerError>;

    /// True when any ledger entry references the rate. Backs the
    /// delete-with-dependents guard.
    async fn exists_for_rate(&self, rate_id: &RateId) -> Result<bool, LedgerError>;

    /// Reporting reads for external collaborators.
    async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CommissionTransaction>, LedgerError>;
}
