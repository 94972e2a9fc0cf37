//! CreatePayoutHandler - Batches a store's calculated commission for a period.

use std::sync::Arc;

use crate::domain::foundation::{BillingPeriod, LedgerError, StoreId};
use crate::domain::payout::CommissionPayout;
use crate::ports::{PayoutRepository, StoreRepository, TransactionRepository};

/// Command to open a payout for one store and billing period.
#[derive(Debug, Clone)]
pub struct CreatePayoutCommand {
    pub store_id: StoreId,
    pub period: BillingPeriod,
    pub notes: Option<String>,
}

/// Handler aggregating `calculated` ledger entries into a pending payout.
///
/// The aggregation is a snapshot: entries recorded for the same period after
/// the payout exists are excluded and flow into a future payout. Uniqueness
/// of `(store, period)` is guaranteed by the repository's insert, so two
/// concurrent calls resolve to exactly one winner.
pub struct CreatePayoutHandler {
    stores: Arc<dyn StoreRepository>,
    transactions: Arc<dyn TransactionRepository>,
    payouts: Arc<dyn PayoutRepository>,
}

impl CreatePayoutHandler {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        transactions: Arc<dyn TransactionRepository>,
        payouts: Arc<dyn PayoutRepository>,
    ) -> Self {
        Self {
            stores,
            transactions,
            payouts,
        }
    }

    pub async fn handle(&self, cmd: CreatePayoutCommand) -> Result<CommissionPayout, LedgerError> {
        if self.stores.find_by_id(&cmd.store_id).await?.is_none() {
            return Err(LedgerError::not_found("store", cmd.store_id));
        }

        let totals = self
            .transactions
            .sum_calculated(&cmd.store_id, &cmd.period)
            .await?;

        let payout = CommissionPayout::from_snapshot(
            cmd.store_id,
            cmd.period,
            totals.total_commission,
            totals.transaction_count,
            cmd.notes,
        )?;

        // The unique (store, period) constraint is the arbiter under
        // concurrency; no pre-check can replace it.
        self.payouts.insert(&payout).await?;

        tracing::info!(
            payout_id = %payout.id,
            store_id = %payout.store_id,
            period = %payout.period,
            total_commission = %payout.total_commission,
            transaction_count = payout.transaction_count,
            "payout created"
        );
        Ok(payout)
    }
}
