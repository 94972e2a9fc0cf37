//! ManageRatesHandler - Operator CRUD over commission rates.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::commission::{CommissionRate, CommissionType};
use crate::domain::foundation::{CategoryId, LedgerError, RateId};
use crate::ports::{RateCache, RateRepository, TransactionRepository};

/// Incoming rate fields for create and update.
#[derive(Debug, Clone)]
pub struct RateDraft {
    pub category_id: CategoryId,
    pub commission_type: CommissionType,
    pub commission_value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

/// Handler for the commission-rate maintenance surface.
///
/// Every successful mutation invalidates the cache entry of the affected
/// category (both old and new category on a move).
pub struct ManageRatesHandler {
    rates: Arc<dyn RateRepository>,
    transactions: Arc<dyn TransactionRepository>,
    cache: Arc<dyn RateCache>,
}

impl ManageRatesHandler {
    pub fn new(
        rates: Arc<dyn RateRepository>,
        transactions: Arc<dyn TransactionRepository>,
        cache: Arc<dyn RateCache>,
    ) -> Self {
        Self {
            rates,
            transactions,
            cache,
        }
    }

    pub async fn create(&self, draft: RateDraft) -> Result<CommissionRate, LedgerError> {
        let rate = CommissionRate::new(
            draft.category_id,
            draft.commission_type,
            draft.commission_value,
            draft.min_amount,
            draft.max_amount,
        )?;
        self.rates.insert(&rate).await?;
        self.invalidate(&rate.category_id).await;
        tracing::info!(rate_id = %rate.id, category_id = %rate.category_id, "commission rate created");
        Ok(rate)
    }

    pub async fn update(&self, id: RateId, draft: RateDraft) -> Result<CommissionRate, LedgerError> {
        let mut rate = self
            .rates
            .find_by_id(&id)
            .await?
            .ok_or_else(|| LedgerError::not_found("commission rate", id))?;

        let previous_category = rate.category_id;
        rate.category_id = draft.category_id;
        rate.commission_type = draft.commission_type;
        rate.commission_value = draft.commission_value;
        rate.min_amount = draft.min_amount;
        rate.max_amount = draft.max_amount;
        rate.updated_at = chrono::Utc::now();
        rate.validate()?;

        self.rates.update(&rate).await?;
        self.invalidate(&previous_category).await;
        if rate.category_id != previous_category {
            self.invalidate(&rate.category_id).await;
        }
        Ok(rate)
    }

    /// Deletes a rate outright. Refused with `Conflict` when ledger entries
    /// reference it; the operator should deactivate instead.
    pub async fn delete(&self, id: RateId) -> Result<(), LedgerError> {
        let rate = self
            .rates
            .find_by_id(&id)
            .await?
            .ok_or_else(|| LedgerError::not_found("commission rate", id))?;

        if self.transactions.exists_for_rate(&id).await? {
            return Err(LedgerError::conflict(
                "rate is referenced by commission transactions; deactivate instead of delete",
            ));
        }

        self.rates.delete(&id).await?;
        self.invalidate(&rate.category_id).await;
        Ok(())
    }

    /// Soft-retires a rate, keeping it for audit of past transactions.
    pub async fn deactivate(&self, id: RateId) -> Result<CommissionRate, LedgerError> {
        let mut rate = self
            .rates
            .find_by_id(&id)
            .await?
            .ok_or_else(|| LedgerError::not_found("commission rate", id))?;
        rate.deactivate();
        self.rates.update(&rate).await?;
        self.invalidate(&rate.category_id).await;
        Ok(rate)
    }

    pub async fn get(&self, id: RateId) -> Result<CommissionRate, LedgerError> {
        self.rates
            .find_by_id(&id)
            .await?
            .ok_or_else(|| LedgerError::not_found("commission rate", id))
    }

    pub async fn list(&self) -> Result<Vec<CommissionRate>, LedgerError> {
        self.rates.list().await
    }

    async fn invalidate(&self, category_id: &CategoryId) {
        if let Err(e) = self.cache.invalidate(category_id).await {
            tracing::warn!(category_id = %category_id, error = %e, "rate cache invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryRateCache;
    use crate::adapters::memory::{InMemoryRateRepository, InMemoryTransactionRepository};
    use crate::domain::commission::CommissionTransaction;
    use crate::domain::foundation::{OrderId, StoreId};
    use rust_decimal_macros::dec;

    struct Fixture {
        handler: ManageRatesHandler,
        transactions: Arc<InMemoryTransactionRepository>,
        cache: Arc<InMemoryRateCache>,
    }

    fn fixture() -> Fixture {
        let rates = Arc::new(InMemoryRateRepository::new());
        let transactions = Arc::new(InMemoryTransactionRepository::new());
        let cache = Arc::new(InMemoryRateCache::with_default_ttl());
        Fixture {
            handler: ManageRatesHandler::new(rates, transactions.clone(), cache.clone()),
            transactions,
            cache,
        }
    }

    fn draft(category_id: CategoryId) -> RateDraft {
        RateDraft {
            category_id,
            commission_type: CommissionType::Percentage,
            commission_value: dec!(0.10),
            min_amount: None,
            max_amount: None,
        }
    }

    #[tokio::test]
    async fn second_active_rate_for_category_conflicts() {
        let f = fixture();
        let category_id = CategoryId::new();
        f.handler.create(draft(category_id)).await.unwrap();

        let result = f.handler.create(draft(category_id)).await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_rejects_invalid_bounds() {
        let f = fixture();
        let mut d = draft(CategoryId::new());
        d.min_amount = Some(dec!(100));
        d.max_amount = Some(dec!(10));
        let result = f.handler.create(d).await;
        assert!(matches!(result, Err(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn update_onto_occupied_category_conflicts() {
        let f = fixture();
        let occupied = CategoryId::new();
        f.handler.create(draft(occupied)).await.unwrap();
        let movable = f.handler.create(draft(CategoryId::new())).await.unwrap();

        let result = f.handler.update(movable.id, draft(occupied)).await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_with_referencing_transactions_conflicts() {
        let f = fixture();
        let rate = f.handler.create(draft(CategoryId::new())).await.unwrap();
        let txn =
            CommissionTransaction::record(StoreId::new(), OrderId::new(), dec!(100), &rate)
                .unwrap();
        f.transactions.insert(&txn).await.unwrap();

        let result = f.handler.delete(rate.id).await;
        assert!(matches!(result, Err(LedgerError::Conflict(_))));

        // deactivation remains available
        let retired = f.handler.deactivate(rate.id).await.unwrap();
        assert!(!retired.is_active);
    }

    #[tokio::test]
    async fn delete_without_dependents_succeeds() {
        let f = fixture();
        let rate = f.handler.create(draft(CategoryId::new())).await.unwrap();
        f.handler.delete(rate.id).await.unwrap();
        let result = f.handler.get(rate.id).await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));
    }

    #[tokio::test]
    async fn mutation_invalidates_cached_rate() {
        let f = fixture();
        let rate = f.handler.create(draft(CategoryId::new())).await.unwrap();
        f.cache.put(&rate).await.unwrap();

        f.handler.deactivate(rate.id).await.unwrap();
        assert!(f.cache.get(&rate.category_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deactivated_category_accepts_a_new_active_rate() {
        let f = fixture();
        let category_id = CategoryId::new();
        let first = f.handler.create(draft(category_id)).await.unwrap();
        f.handler.deactivate(first.id).await.unwrap();

        assert!(f.handler.create(draft(category_id)).await.is_ok());
    }
}
