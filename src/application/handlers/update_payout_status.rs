//! UpdatePayoutStatusHandler - Drives the payout lifecycle.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::foundation::{LedgerError, OperatorId, PayoutId, StateMachine};
use crate::domain::payout::{CommissionPayout, PayoutStatus};
use crate::ports::{
    PayoutRepository, ReconciliationQueue, ReconciliationTask, TransactionRepository,
};

/// Command to advance a payout through its lifecycle.
#[derive(Debug, Clone)]
pub struct UpdatePayoutStatusCommand {
    pub payout_id: PayoutId,
    pub new_status: PayoutStatus,
    pub operator: OperatorId,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
}

/// Handler validating transitions and running the completion cascade.
///
/// On entering `completed` the store's `calculated` entries in the payout
/// period are bulk-marked `paid`. A cascade failure does not undo the
/// completion: the external settlement already happened, so the payout stays
/// `completed`, the failure is logged as an operational alert, and a
/// reconciliation task is enqueued for out-of-band replay.
pub struct UpdatePayoutStatusHandler {
    payouts: Arc<dyn PayoutRepository>,
    transactions: Arc<dyn TransactionRepository>,
    reconciliation: Arc<dyn ReconciliationQueue>,
}

impl UpdatePayoutStatusHandler {
    pub fn new(
        payouts: Arc<dyn PayoutRepository>,
        transactions: Arc<dyn TransactionRepository>,
        reconciliation: Arc<dyn ReconciliationQueue>,
    ) -> Self {
        Self {
            payouts,
            transactions,
            reconciliation,
        }
    }

    pub async fn handle(
        &self,
        cmd: UpdatePayoutStatusCommand,
    ) -> Result<CommissionPayout, LedgerError> {
        let mut payout = self
            .payouts
            .find_by_id(&cmd.payout_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("payout", cmd.payout_id))?;

        payout.status = payout.status.transition_to(cmd.new_status)?;

        if matches!(cmd.new_status, PayoutStatus::Processing | PayoutStatus::Completed) {
            payout.processed_at = Some(Utc::now());
            payout.processed_by = Some(cmd.operator.clone());
        }
        if let Some(reference) = cmd.payment_reference {
            payout.payment_reference = Some(reference);
        }
        if let Some(notes) = cmd.notes {
            payout.notes = Some(notes);
        }

        self.payouts.update_status(&payout).await?;
        tracing::info!(
            payout_id = %payout.id,
            status = %payout.status,
            operator = %cmd.operator,
            "payout status updated"
        );

        if payout.status == PayoutStatus::Completed {
            self.cascade(&payout).await;
        }

        Ok(payout)
    }

    /// Marks the payout's ledger snapshot `paid`. Never fails the caller.
    async fn cascade(&self, payout: &CommissionPayout) {
        match self
            .transactions
            .mark_paid_for_period(&payout.store_id, &payout.period, Utc::now())
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    payout_id = %payout.id,
                    store_id = %payout.store_id,
                    period = %payout.period,
                    transactions_paid = updated,
                    "payout completion cascaded to ledger"
                );
            }
            Err(e) => {
                // The settlement is confirmed upstream; keep the payout
                // completed and leave the ledger fix to reconciliation.
                tracing::error!(
                    payout_id = %payout.id,
                    store_id = %payout.store_id,
                    period = %payout.period,
                    error = %e,
                    "payout completed but ledger cascade failed; reconciliation required"
                );
                let task = ReconciliationTask::new(
                    payout.id,
                    payout.store_id,
                    payout.period,
                    e.to_string(),
                );
                if let Err(enqueue_err) = self.reconciliation.enqueue(task).await {
                    tracing::error!(
                        payout_id = %payout.id,
                        error = %enqueue_err,
                        "failed to enqueue cascade reconciliation task"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryPayoutRepository, InMemoryReconciliationQueue, InMemoryTransactionRepository,
    };
    use crate::domain::commission::{
        CommissionRate, CommissionTransaction, CommissionType, TransactionStatus,
    };
    use crate::domain::foundation::{BillingPeriod, CategoryId, OrderId, StoreId};
    use crate::ports::{PeriodTotals, TransactionFilter};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct Fixture {
        handler: UpdatePayoutStatusHandler,
        payouts: Arc<InMemoryPayoutRepository>,
        transactions: Arc<InMemoryTransactionRepository>,
        reconciliation: Arc<InMemoryReconciliationQueue>,
    }

    fn fixture() -> Fixture {
        let payouts = Arc::new(InMemoryPayoutRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let reconciliation = Arc::new(InMemoryReconciliationQueue::new());
        Fixture {
            handler: UpdatePayoutStatusHandler::new(
                payouts.clone(),
                transactions.clone(),
                reconciliation.clone(),
            ),
            payouts,
            transactions,
            reconciliation,
        }
    }

    fn operator() -> OperatorId {
        OperatorId::new("finance-ops").unwrap()
    }

    fn cmd(payout_id: PayoutId, status: PayoutStatus) -> UpdatePayoutStatusCommand {
        UpdatePayoutStatusCommand {
            payout_id,
            new_status: status,
            operator: operator(),
            notes: None,
            payment_reference: None,
        }
    }

    async fn seed_payout(f: &Fixture, store_id: StoreId, period: BillingPeriod) -> CommissionPayout {
        let payout =
            CommissionPayout::from_snapshot(store_id, period, dec!(120), 3, None).unwrap();
        f.payouts.insert(&payout).await.unwrap();
        payout
    }

    async fn seed_transaction(
        f: &Fixture,
        store_id: StoreId,
        created_at: DateTime<Utc>,
    ) -> CommissionTransaction {
        let rate = CommissionRate::new(
            CategoryId::new(),
            CommissionType::Fixed,
            dec!(40),
            None,
            None,
        )
        .unwrap();
        let mut txn =
            CommissionTransaction::record(store_id, OrderId::new(), dec!(100), &rate).unwrap();
        txn.created_at = created_at;
        f.transactions.insert(&txn).await.unwrap();
        txn
    }

    fn january() -> BillingPeriod {
        "2025-01".parse().unwrap()
    }

    #[tokio::test]
    async fn processing_transition_stamps_operator() {
        let f = fixture();
        let payout = seed_payout(&f, StoreId::new(), january()).await;

        let updated = f
            .handler
            .handle(cmd(payout.id, PayoutStatus::Processing))
            .await
            .unwrap();

        assert_eq!(updated.status, PayoutStatus::Processing);
        assert_eq!(updated.processed_by, Some(operator()));
        assert!(updated.processed_at.is_some());
    }

    #[tokio::test]
    async fn invalid_transition_is_rejected() {
        let f = fixture();
        let payout = seed_payout(&f, StoreId::new(), january()).await;

        let result = f.handler.handle(cmd(payout.id, PayoutStatus::Completed)).await;
        assert!(matches!(result, Err(LedgerError::InvalidTransition { .. })));

        // stored payout is untouched
        let stored = f.payouts.find_by_id(&payout.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PayoutStatus::Pending);
    }

    #[tokio::test]
    async fn completion_cascades_to_period_transactions_only() {
        let f = fixture();
        let store_id = StoreId::new();
        let in_period = seed_transaction(
            &f,
            store_id,
            Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
        )
        .await;
        let out_of_period = seed_transaction(
            &f,
            store_id,
            Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap(),
        )
        .await;
        let other_store = seed_transaction(
            &f,
            StoreId::new(),
            Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
        )
        .await;

        let payout = seed_payout(&f, store_id, january()).await;
        f.handler
            .handle(cmd(payout.id, PayoutStatus::Processing))
            .await
            .unwrap();
        f.handler
            .handle(cmd(payout.id, PayoutStatus::Completed))
            .await
            .unwrap();

        let all = f.transactions.list(&TransactionFilter::default()).await.unwrap();
        let by_id = |id| all.iter().find(|t| t.id == id).unwrap().clone();

        let paid = by_id(in_period.id);
        assert_eq!(paid.status, TransactionStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(by_id(out_of_period.id).status, TransactionStatus::Calculated);
        assert_eq!(by_id(other_store.id).status, TransactionStatus::Calculated);
    }

    #[tokio::test]
    async fn completed_is_terminal() {
        let f = fixture();
        let payout = seed_payout(&f, StoreId::new(), january()).await;
        f.handler
            .handle(cmd(payout.id, PayoutStatus::Processing))
            .await
            .unwrap();
        f.handler
            .handle(cmd(payout.id, PayoutStatus::Completed))
            .await
            .unwrap();

        let result = f.handler.handle(cmd(payout.id, PayoutStatus::Pending)).await;
        assert!(matches!(result, Err(LedgerError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn failed_payout_retries_to_pending() {
        let f = fixture();
        let payout = seed_payout(&f, StoreId::new(), january()).await;
        f.handler.handle(cmd(payout.id, PayoutStatus::Failed)).await.unwrap();
        let retried = f.handler.handle(cmd(payout.id, PayoutStatus::Pending)).await.unwrap();
        assert_eq!(retried.status, PayoutStatus::Pending);
    }

    // Transaction repository that refuses the cascade.
    struct FailingCascadeRepository(Arc<InMemoryTransactionRepository>);

    #[async_trait]
    impl TransactionRepository for FailingCascadeRepository {
        async fn insert(&self, txn: &CommissionTransaction) -> Result<(), LedgerError> {
            self.0.insert(txn).await
        }

        async fn sum_calculated(
            &self,
            store_id: &StoreId,
            period: &BillingPeriod,
        ) -> Result<PeriodTotals, LedgerError> {
            self.0.sum_calculated(store_id, period).await
        }

        async fn mark_paid_for_period(
            &self,
            _store_id: &StoreId,
            _period: &BillingPeriod,
            _paid_at: DateTime<Utc>,
        ) -> Result<u64, LedgerError> {
            Err(LedgerError::Storage("ledger unavailable".to_string()))
        }

        async fn exists_for_rate(
            &self,
            rate_id: &crate::domain::foundation::RateId,
        ) -> Result<bool, LedgerError> {
            self.0.exists_for_rate(rate_id).await
        }

        async fn list(
            &self,
            filter: &TransactionFilter,
        ) -> Result<Vec<CommissionTransaction>, LedgerError> {
            self.0.list(filter).await
        }
    }

    #[tokio::test]
    async fn cascade_failure_keeps_payout_completed_and_enqueues_reconciliation() {
        let payouts = Arc::new(InMemoryPayoutRepository::new());
        let reconciliation = Arc::new(InMemoryReconciliationQueue::new());
        let failing = Arc::new(FailingCascadeRepository(Arc::new(
            InMemoryTransactionRepository::new(),
        )));
        let handler =
            UpdatePayoutStatusHandler::new(payouts.clone(), failing, reconciliation.clone());

        let payout = CommissionPayout::from_snapshot(StoreId::new(), january(), dec!(50), 1, None)
            .unwrap();
        payouts.insert(&payout).await.unwrap();

        handler.handle(cmd(payout.id, PayoutStatus::Processing)).await.unwrap();
        let completed = handler.handle(cmd(payout.id, PayoutStatus::Completed)).await.unwrap();

        // the payout stays completed despite the failed cascade
        assert_eq!(completed.status, PayoutStatus::Completed);
        let stored = payouts.find_by_id(&payout.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PayoutStatus::Completed);

        // and the inconsistency is tracked for reconciliation
        let pending = reconciliation.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].payout_id, payout.id);
        assert!(pending[0].error.contains("ledger unavailable"));
    }

    #[tokio::test]
    async fn unknown_payout_is_not_found() {
        let f = fixture();
        let result = f.handler.handle(cmd(PayoutId::new(), PayoutStatus::Processing)).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }
}
