//! PostgreSQL implementation of RateRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::commission::{CommissionRate, CommissionType};
use crate::domain::foundation::{CategoryId, LedgerError, RateId};
use crate::ports::RateRepository;

/// Partial unique index backing the one-active-rate-per-category invariant.
const ACTIVE_CATEGORY_CONSTRAINT: &str = "uq_commission_rates_active_category";

pub struct PostgresRateRepository {
    pool: PgPool,
}

impl PostgresRateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RateRow {
    id: Uuid,
    category_id: Uuid,
    commission_type: String,
    commission_value: Decimal,
    min_amount: Option<Decimal>,
    max_amount: Option<Decimal>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RateRow> for CommissionRate {
    type Error = LedgerError;

    fn try_from(row: RateRow) -> Result<Self, Self::Error> {
        Ok(CommissionRate {
            id: RateId::from_uuid(row.id),
            category_id: CategoryId::from_uuid(row.category_id),
            commission_type: CommissionType::parse(&row.commission_type)?,
            commission_value: row.commission_value,
            min_amount: row.min_amount,
            max_amount: row.max_amount,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn map_conflict(e: sqlx::Error, category_id: &CategoryId) -> LedgerError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(ACTIVE_CATEGORY_CONSTRAINT) {
            return LedgerError::conflict(format!(
                "an active commission rate already exists for category {}",
                category_id
            ));
        }
    }
    LedgerError::Storage(format!("failed to write commission rate: {}", e))
}

const SELECT_COLUMNS: &str = "id, category_id, commission_type, commission_value, \
     min_amount, max_amount, is_active, created_at, updated_at";

#[async_trait]
impl RateRepository for PostgresRateRepository {
    async fn insert(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO commission_rates (
                id, category_id, commission_type, commission_value,
                min_amount, max_amount, is_active, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(rate.id.as_uuid())
        .bind(rate.category_id.as_uuid())
        .bind(rate.commission_type.as_str())
        .bind(rate.commission_value)
        .bind(rate.min_amount)
        .bind(rate.max_amount)
        .bind(rate.is_active)
        .bind(rate.created_at)
        .bind(rate.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_conflict(e, &rate.category_id))?;

        Ok(())
    }

    async fn update(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE commission_rates SET
                category_id = $2,
                commission_type = $3,
                commission_value = $4,
                min_amount = $5,
                max_amount = $6,
                is_active = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(rate.id.as_uuid())
        .bind(rate.category_id.as_uuid())
        .bind(rate.commission_type.as_str())
        .bind(rate.commission_value)
        .bind(rate.min_amount)
        .bind(rate.max_amount)
        .bind(rate.is_active)
        .bind(rate.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_conflict(e, &rate.category_id))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("commission rate", rate.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &RateId) -> Result<(), LedgerError> {
        let result = sqlx::query("DELETE FROM commission_rates WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Storage(format!("failed to delete rate: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("commission rate", id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &RateId) -> Result<Option<CommissionRate>, LedgerError> {
        let row: Option<RateRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_rates WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to find rate: {}", e)))?;

        row.map(CommissionRate::try_from).transpose()
    }

    async fn find_active_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Option<CommissionRate>, LedgerError> {
        let row: Option<RateRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_rates WHERE category_id = $1 AND is_active",
            SELECT_COLUMNS
        ))
        .bind(category_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to resolve rate: {}", e)))?;

        row.map(CommissionRate::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<CommissionRate>, LedgerError> {
        let rows: Vec<RateRow> = sqlx::query_as(&format!(
            "SELECT {} FROM commission_rates ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to list rates: {}", e)))?;

        rows.into_iter().map(CommissionRate::try_from).collect()
    }
}
