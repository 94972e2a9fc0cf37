//! PostgreSQL implementation of TransactionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::commission::{CommissionTransaction, TransactionStatus};
use crate::domain::foundation::{
    BillingPeriod, CategoryId, LedgerError, OrderId, RateId, StoreId, TransactionId,
};
use crate::ports::{PeriodTotals, TransactionFilter, TransactionRepository};

pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    store_id: Uuid,
    category_id: Uuid,
    order_id: Uuid,
    rate_id: Uuid,
    order_amount: Decimal,
    commission_rate_applied: Decimal,
    commission_amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<TransactionRow> for CommissionTransaction {
    type Error = LedgerError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        Ok(CommissionTransaction {
            id: TransactionId::from_uuid(row.id),
            store_id: StoreId::from_uuid(row.store_id),
            category_id: CategoryId::from_uuid(row.category_id),
            order_id: OrderId::from_uuid(row.order_id),
            rate_id: RateId::from_uuid(row.rate_id),
            order_amount: row.order_amount,
            commission_rate_applied: row.commission_rate_applied,
            commission_amount: row.commission_amount,
            status: TransactionStatus::parse(&row.status)?,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, transaction: &CommissionTransaction) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO commission_transactions (
                id, store_id, category_id, order_id, rate_id, order_amount,
                commission_rate_applied, commission_amount, status, created_at, paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(transaction.store_id.as_uuid())
        .bind(transaction.category_id.as_uuid())
        .bind(transaction.order_id.as_uuid())
        .bind(transaction.rate_id.as_uuid())
        .bind(transaction.order_amount)
        .bind(transaction.commission_rate_applied)
        .bind(transaction.commission_amount)
        .bind(transaction.status.as_str())
        .bind(transaction.created_at)
        .bind(transaction.paid_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to insert transaction: {}", e)))?;

        Ok(())
    }

    async fn sum_calculated(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
    ) -> Result<PeriodTotals, LedgerError> {
        let (total, count): (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(commission_amount), 0), COUNT(*)
            FROM commission_transactions
            WHERE store_id = $1
              AND status = 'calculated'
              AND created_at >= $2
              AND created_at < $3
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(period.start())
        .bind(period.end())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to aggregate period: {}", e)))?;

        Ok(PeriodTotals {
            total_commission: total,
            transaction_count: count as u32,
        })
    }

    async fn mark_paid_for_period(
        &self,
        store_id: &StoreId,
        period: &BillingPeriod,
        paid_at: DateTime<Utc>,
    ) -> Result<u64, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE commission_transactions
            SET status = 'paid', paid_at = $4
            WHERE store_id = $1
              AND status = 'calculated'
              AND created_at >= $2
              AND created_at < $3
            "#,
        )
        .bind(store_id.as_uuid())
        .bind(period.start())
        .bind(period.end())
        .bind(paid_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to cascade paid status: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn exists_for_rate(&self, rate_id: &RateId) -> Result<bool, LedgerError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM commission_transactions WHERE rate_id = $1)",
        )
        .bind(rate_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to check rate references: {}", e)))?;

        Ok(exists)
    }

    async fn list(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<CommissionTransaction>, LedgerError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, store_id, category_id, order_id, rate_id, order_amount,
                   commission_rate_applied, commission_amount, status, created_at, paid_at
            FROM commission_transactions
            WHERE ($1::uuid IS NULL OR store_id = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at < $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.store_id.map(|s| *s.as_uuid()))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.created_from)
        .bind(filter.created_until)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to list transactions: {}", e)))?;

        rows.into_iter().map(CommissionTransaction::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn row_conversion_parses_status() {
        let row = TransactionRow {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            rate_id: Uuid::new_v4(),
            order_amount: dec!(100),
            commission_rate_applied: dec!(0.10),
            commission_amount: dec!(10),
            status: "calculated".to_string(),
            created_at: Utc::now(),
            paid_at: None,
        };

        let txn = CommissionTransaction::try_from(row).unwrap();
        assert_eq!(txn.status, TransactionStatus::Calculated);
        assert!(txn.paid_at.is_none());
    }

    #[test]
    fn row_conversion_rejects_unknown_status() {
        let row = TransactionRow {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            category_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            rate_id: Uuid::new_v4(),
            order_amount: dec!(100),
            commission_rate_applied: dec!(0.10),
            commission_amount: dec!(10),
            status: "settled".to_string(),
            created_at: Utc::now(),
            paid_at: None,
        };

        assert!(CommissionTransaction::try_from(row).is_err());
    }
}
