//! PostgreSQL implementation of PayoutRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{LedgerError, OperatorId, PayoutId, StoreId};
use crate::domain::payout::{CommissionPayout, PayoutStatus};
use crate::ports::PayoutRepository;

/// Unique constraint backing one payout per (store, period).
const STORE_PERIOD_CONSTRAINT: &str = "uq_commission_payouts_store_period";

pub struct PostgresPayoutRepository {
    pool: PgPool,
}

impl PostgresPayoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PayoutRow {
    id: Uuid,
    store_id: Uuid,
    period: String,
    total_commission: Decimal,
    total_payout: Decimal,
    transaction_count: i32,
    status: String,
    payment_reference: Option<String>,
    notes: Option<String>,
    processed_by: Option<String>,
    processed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PayoutRow> for CommissionPayout {
    type Error = LedgerError;

    fn try_from(row: PayoutRow) -> Result<Self, Self::Error> {
        Ok(CommissionPayout {
            id: PayoutId::from_uuid(row.id),
            store_id: StoreId::from_uuid(row.store_id),
            period: row.period.parse()?,
            total_commission: row.total_commission,
            total_payout: row.total_payout,
            transaction_count: row.transaction_count as u32,
            status: PayoutStatus::parse(&row.status)?,
            payment_reference: row.payment_reference,
            notes: row.notes,
            processed_by: row.processed_by.map(OperatorId::new).transpose()?,
            processed_at: row.processed_at,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, store_id, period, total_commission, total_payout, \
     transaction_count, status, payment_reference, notes, processed_by, processed_at, created_at";

#[async_trait]
impl PayoutRepository for PostgresPayoutRepository {
    async fn insert(&self, payout: &CommissionPayout) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO commission_payouts (
                id, store_id, period, total_commission, total_payout,
                transaction_count, status, payment_reference, notes,
                processed_by, processed_at, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(payout.id.as_uuid())
        .bind(payout.store_id.as_uuid())
        .bind(payout.period.to_string())
        .bind(payout.total_commission)
        .bind(payout.total_payout)
        .bind(payout.transaction_count as i32)
        .bind(payout.status.as_str())
        .bind(&payout.payment_reference)
        .bind(&payout.notes)
        .bind(payout.processed_by.as_ref().map(|o| o.as_str().to_string()))
        .bind(payout.processed_at)
        .bind(payout.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some(STORE_PERIOD_CONSTRAINT) {
                    return LedgerError::conflict(format!(
                        "payout already exists for store {} in period {}",
                        payout.store_id, payout.period
                    ));
                }
            }
            LedgerError::Storage(format!("failed to insert payout: {}", e))
        })?;

        Ok(())
    }

    async fn update_status(&self, payout: &CommissionPayout) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE commission_payouts SET
                status = $2,
                payment_reference = $3,
                notes = $4,
                processed_by = $5,
                processed_at = $6
            WHERE id = $1
            "#,
        )
        .bind(payout.id.as_uuid())
        .bind(payout.status.as_str())
        .bind(&payout.payment_reference)
        .bind(&payout.notes)
        .bind(payout.processed_by.as_ref().map(|o| o.as_str().to_string()))
        .bind(payout.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to update payout: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("payout", payout.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PayoutId) -> Result<Option<CommissionPayout>, LedgerError> {
        let row: Option<PayoutRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_payouts WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to find payout: {}", e)))?;

        row.map(CommissionPayout::try_from).transpose()
    }

    async fn list_by_store(
        &self,
        store_id: &StoreId,
    ) -> Result<Vec<CommissionPayout>, LedgerError> {
        let rows: Vec<PayoutRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_payouts WHERE store_id = $1 ORDER BY period DESC",
            SELECT_COLUMNS
        ))
        .bind(store_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to list payouts: {}", e)))?;

        rows.into_iter().map(CommissionPayout::try_from).collect()
    }
}
