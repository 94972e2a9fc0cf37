//! RecordCommissionHandler - Ledger entry creation at order completion.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::application::handlers::RateResolver;
use crate::domain::commission::CommissionTransaction;
use crate::domain::foundation::{CategoryId, LedgerError, OrderId, StoreId};
use crate::ports::{StoreRepository, TransactionRepository};

/// Command issued by the marketplace when an order completes.
#[derive(Debug, Clone)]
pub struct RecordCommissionCommand {
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub order_id: OrderId,
    pub order_amount: Decimal,
}

/// Handler recording one `calculated` ledger entry per qualifying order.
///
/// Marking entries `paid` is not part of this surface; only the
/// payout-completion cascade does that.
pub struct RecordCommissionHandler {
    stores: Arc<dyn StoreRepository>,
    transactions: Arc<dyn TransactionRepository>,
    resolver: Arc<RateResolver>,
}

impl RecordCommissionHandler {
    pub fn new(
        stores: Arc<dyn StoreRepository>,
        transactions: Arc<dyn TransactionRepository>,
        resolver: Arc<RateResolver>,
    ) -> Self {
        Self {
            stores,
            transactions,
            resolver,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordCommissionCommand,
    ) -> Result<CommissionTransaction, LedgerError> {
        let store = self
            .stores
            .find_by_id(&cmd.store_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("store", cmd.store_id))?;

        if !store.accepts_commission() {
            return Err(LedgerError::validation(
                "store_id",
                format!(
                    "store {} has subscription status '{}'; orders do not accrue commission",
                    store.id,
                    store.subscription_status.as_str()
                ),
            ));
        }

        let rate = self.resolver.resolve(&cmd.category_id).await?;
        let transaction =
            CommissionTransaction::record(cmd.store_id, cmd.order_id, cmd.order_amount, &rate)?;
        self.transactions.insert(&transaction).await?;

        tracing::info!(
            transaction_id = %transaction.id,
            store_id = %transaction.store_id,
            order_id = %transaction.order_id,
            commission_amount = %transaction.commission_amount,
            "commission recorded"
        );
        Ok(transaction)
    }
}
