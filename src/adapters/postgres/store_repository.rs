//! PostgreSQL implementation of StoreRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{LedgerError, StoreId};
use crate::domain::store::{Store, SubscriptionStatus};
use crate::ports::StoreRepository;

pub struct PostgresStoreRepository {
    pool: PgPool,
}

impl PostgresStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StoreRow {
    id: Uuid,
    name: String,
    gateway_customer_id: Option<String>,
    gateway_subscription_id: Option<String>,
    subscription_status: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for Store {
    type Error = LedgerError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        Ok(Store {
            id: StoreId::from_uuid(row.id),
            name: row.name,
            gateway_customer_id: row.gateway_customer_id,
            gateway_subscription_id: row.gateway_subscription_id,
            subscription_status: SubscriptionStatus::parse(&row.subscription_status)?,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "id, name, gateway_customer_id, gateway_subscription_id, subscription_status, updated_at";

#[async_trait]
impl StoreRepository for PostgresStoreRepository {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, LedgerError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "SELECT {} FROM stores WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to find store: {}", e)))?;

        row.map(Store::try_from).transpose()
    }

    async fn find_by_gateway_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Store>, LedgerError> {
        let row: Option<StoreRow> = sqlx::query_as(&format!(
            "SELECT {} FROM stores \
             WHERE gateway_subscription_id = $1 OR gateway_customer_id = $1",
            SELECT_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to find store by reference: {}", e)))?;

        row.map(Store::try_from).transpose()
    }

    async fn set_subscription_status(
        &self,
        id: &StoreId,
        status: SubscriptionStatus,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            "UPDATE stores SET subscription_status = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            LedgerError::Storage(format!("failed to update subscription status: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("store", id));
        }
        Ok(())
    }
}
