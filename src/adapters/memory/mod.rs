//! In-memory port implementations.
//!
//! Used by the test suite and by single-instance development runs. Each
//! repository holds its rows behind one `RwLock`, which is what makes the
//! check-and-insert paths (active-rate uniqueness, payout periods, webhook
//! idempotency keys) race-safe without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::commission::{CommissionRate, CommissionTransaction, TransactionStatus};
use crate::domain::foundation::{
    BillingPeriod, CategoryId, LedgerError, PayoutId, RateId, StoreId,
};
use crate::domain::payout::CommissionPayout;
use crate::domain::store::{Store, SubscriptionStatus};
use crate::ports::{
    InsertOutcome, PayoutRepository, PeriodTotals, RateRepository, ReconciliationQueue,
    ReconciliationTask, StoreRepository, TransactionFilter, TransactionRepository,
    WebhookEventRecord, WebhookEventRepository, WebhookEventStatus,
};

/// In-memory commission rate storage.
#[derive(Default)]
pub struct InMemoryRateRepository {
    rates: Arc<RwLock<Vec<CommissionRate>>>,
}

impl InMemoryRateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateRepository for InMemoryRateRepository {
    async fn insert(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        let mut rates = self.rates.write().await;
        if rate.is_active
            && rates
                .iter()
                .any(|r| r.is_active && r.category_id == rate.category_id)
        {
            return Err(LedgerError::conflict(format!(
                "an active commission rate already exists for category {}",
                rate.category_id
            )));
        }
        rates.push(rate.clone());
        Ok(())
    }

    async fn update(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        let mut rates = self.rates.write().await;
        if rate.is_active
            && rates
                .iter()
                .any(|r| r.is_active && r.category_id == rate.category_id && r.id != rate.id)
        {
            return Err(LedgerError::conflict(format!(
                "an active commission rate already exists for category {}",
                rate.category_id
            )));
        }
        let existing = rates
            .iter_mut()
            .find(|r| r.id == rate.id)
            .ok_or_else(|| LedgerError::not_found("commission rate", rate.id))?;
        *existing = rate.clone();
        Ok(())
    }

    async fn delete(&self, id: &RateId) -> Result<(), LedgerError> {
        let mut rates = self.rates.write().await;
        let before = rates.len();
        rates.retain(|r| r.id != *id);
        if rates.len() == before {
            return Err(LedgerError::not_found("commission rate", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &RateId) -> Result<Option<CommissionRate>, LedgerError> {
        Ok(self.rates.read().await.iter().find(|r| r.id == *id).cloned())
    }

    async fn find_active_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Option<CommissionRate>, LedgerError> {
        Ok(self
            .rates
            .read()
            .await
            .iter()
            .find(|r| r.is_active && r.category_id == *category_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<CommissionRate>, LedgerError> {
        Ok(self.rates.read().await.clone())
    }
}

/// In-memory commission ledger.
#[derive(Default)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<Vec<CommissionTransaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, transaction: &CommissionTransaction) -> Result<(), LedgerError> {
        self.transactions.write().await.push(transaction.clone());
        Ok(())
    }

    async fn sum_calculated(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
    ) -> Result<PeriodTotals, LedgerError> {
        let transactions = self.transactions.read().await;
        let mut total = Decimal::ZERO;
        let mut count = 0u32;
        for txn in transactions.iter().filter(|t| {
            t.store_id == *store_id
                && t.status == TransactionStatus::Calculated
                && period.contains(t.created_at)
        }) {
            total += txn.commission_amount;
            count += 1;
        }
        Ok(PeriodTotals {
            total_commission: total,
            transaction_count: count,
        })
    }

    async fn mark_paid_for_period(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
        paid_at: DateTime<Utc>,
    ) -> Result<u64, LedgerError> {
        let mut transactions = self.transactions.write().await;
        let mut updated = 0u64;
        for txn in transactions.iter_mut().filter(|t| {
            t.store_id == *store_id
                && t.status == TransactionStatus::Calculated
                && period.contains(t.created_at)
        }) {
            txn.status = TransactionStatus::Paid;
            txn.paid_at = Some(paid_at);
            updated += 1;
        }
        Ok(updated)
    }

    async fn exists_for_rate(&self, rate_id: &RateId) -> Result<bool, LedgerError> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .any(|t| t.rate_id == *rate_id))
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CommissionTransaction>, LedgerError> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .filter(|t| filter.store_id.map_or(true, |s| t.store_id == s))
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.created_from.map_or(true, |from| t.created_at >= from))
            .filter(|t| filter.created_until.map_or(true, |until| t.created_at < until))
            .cloned()
            .collect())
    }
}

/// In-memory payout storage.
#[derive(Default)]
pub struct InMemoryPayoutRepository {
    payouts: Arc<RwLock<Vec<CommissionPayout>>>,
}

impl InMemoryPayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PayoutRepository for InMemoryPayoutRepository {
    async fn insert(&self, payout: &CommissionPayout) -> Result<(), LedgerError> {
        let mut payouts = self.payouts.write().await;
        if payouts
            .iter()
            .any(|p| p.store_id == payout.store_id && p.period == payout.period)
        {
            return Err(LedgerError::conflict(format!(
                "payout already exists for store {} in period {}",
                payout.store_id, payout.period
            )));
        }
        payouts.push(payout.clone());
        Ok(())
    }

    async fn update_status(&self, payout: &CommissionPayout) -> Result<(), LedgerError> {
        let mut payouts = self.payouts.write().await;
        let existing = payouts
            .iter_mut()
            .find(|p| p.id == payout.id)
            .ok_or_else(|| LedgerError::not_found("payout", payout.id))?;
        *existing = payout.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &PayoutId) -> Result<Option<CommissionPayout>, LedgerError> {
        Ok(self.payouts.read().await.iter().find(|p| p.id == *id).cloned())
    }

    async fn list_by_store(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<CommissionPayout>, LedgerError> {
        let mut payouts: Vec<_> = self
            .payouts
            .read()
            .await
            .iter()
            .filter(|p| p.store_id == *store_id)
            .cloned()
            .collect();
        payouts.sort_by_key(|p| std::cmp::Reverse(p.period));
        Ok(payouts)
    }
}

/// In-memory store directory.
#[derive(Default)]
pub struct InMemoryStoreRepository {
    stores: Arc<RwLock<HashMap<StoreId, Store>>>,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store; tests and development bootstrap use this.
    pub async fn seed(&self, store: Store) {
        self.stores.write().await.insert(store.id, store);
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, LedgerError> {
        Ok(self.stores.read().await.get(id).cloned())
    }

    async fn find_by_gateway_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Store>, LedgerError> {
        Ok(self
            .stores
            .read()
            .await
            .values()
            .find(|s| {
                s.gateway_subscription_id.as_deref() == Some(reference)
                    || s.gateway_customer_id.as_deref() == Some(reference)
            })
            .cloned())
    }

    async fn set_subscription_status(
        &self,
        id: &StoreId,
        status: SubscriptionStatus,
    ) -> Result<(), LedgerError> {
        let mut stores = self.stores.write().await;
        let store = stores
            .get_mut(id)
            .ok_or_else(|| LedgerError::not_found("store", id))?;
        store.subscription_status = status;
        store.updated_at = Utc::now();
        Ok(())
    }
}

/// In-memory webhook idempotency records.
#[derive(Default)]
pub struct InMemoryWebhookEventRepository {
    records: Arc<RwLock<HashMap<String, WebhookEventRecord>>>,
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn insert_processing(
        &self,
        record: WebhookEventRecord,
    ) -> Result<InsertOutcome, LedgerError> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get(&record.idempotency_key) {
            return Ok(InsertOutcome::AlreadyExists(existing.clone()));
        }
        records.insert(record.idempotency_key.clone(), record);
        Ok(InsertOutcome::Inserted)
    }

    async fn mark_completed(
        &self,
        idempotency_key: &str,
        note: Option<String>,
    ) -> Result<(), LedgerError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(idempotency_key)
            .ok_or_else(|| LedgerError::not_found("webhook event", idempotency_key))?;
        record.status = WebhookEventStatus::Completed;
        record.error_message = note;
        record.processed_at = Some(Utc::now());
        Ok(())
    }

    async fn mark_failed(&self, idempotency_key: &str, error: String) -> Result<(), LedgerError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(idempotency_key)
            .ok_or_else(|| LedgerError::not_found("webhook event", idempotency_key))?;
        record.status = WebhookEventStatus::Failed;
        record.error_message = Some(error);
        record.processed_at = Some(Utc::now());
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LedgerError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.created_at >= cutoff);
        Ok((before - records.len()) as u64)
    }
}

/// In-memory compensating-action log.
#[derive(Default)]
pub struct InMemoryReconciliationQueue {
    tasks: Arc<RwLock<Vec<ReconciliationTask>>>,
}

impl InMemoryReconciliationQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReconciliationQueue for InMemoryReconciliationQueue {
    async fn enqueue(&self, task: ReconciliationTask) -> Result<(), LedgerError> {
        self.tasks.write().await.push(task);
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<ReconciliationTask>, LedgerError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn mark_resolved(&self, id: &Uuid) -> Result<(), LedgerError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != *id);
        if tasks.len() == before {
            return Err(LedgerError::not_found("reconciliation task", id));
        }
        Ok(())
    }
}
