//! PostgreSQL implementation of WebhookEventRepository.
//!
//! The PRIMARY KEY on `idempotency_key` plus `ON CONFLICT DO NOTHING` makes
//! `insert_processing` the race arbiter: of two concurrent deliveries,
//! exactly one insert sticks and the other reads back the stored record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::foundation::LedgerError;
use crate::ports::{
    InsertOutcome, WebhookEventRecord, WebhookEventRepository, WebhookEventStatus,
};

pub struct PostgresWebhookEventRepository {
    pool: PgPool,
}

impl PostgresWebhookEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WebhookEventRow {
    idempotency_key: String,
    event_type: String,
    payment_id: String,
    status: String,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
}

impl TryFrom<WebhookEventRow> for WebhookEventRecord {
    type Error = LedgerError;

    fn try_from(row: WebhookEventRow) -> Result<Self, Self::Error> {
        Ok(WebhookEventRecord {
            idempotency_key: row.idempotency_key,
            event_type: row.event_type,
            payment_id: row.payment_id,
            status: WebhookEventStatus::parse(&row.status)?,
            error_message: row.error_message,
            created_at: row.created_at,
            processed_at: row.processed_at,
        })
    }
}

#[async_trait]
impl WebhookEventRepository for PostgresWebhookEventRepository {
    async fn insert_processing(
        &self,
        record: WebhookEventRecord,
    ) -> Result<InsertOutcome, LedgerError> {
        let result = sqlx::query(
            r#"
            INSERT INTO webhook_events (
                idempotency_key, event_type, payment_id, status,
                error_message, created_at, processed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (idempotency_key) DO NOTHING
            "#,
        )
        .bind(&record.idempotency_key)
        .bind(&record.event_type)
        .bind(&record.payment_id)
        .bind(record.status.as_str())
        .bind(&record.error_message)
        .bind(record.created_at)
        .bind(record.processed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to insert webhook event: {}", e)))?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted);
        }

        // Lost the race (or a redelivery): read the stored outcome back.
        let row: WebhookEventRow = sqlx::query_as(
            r#"
            SELECT idempotency_key, event_type, payment_id, status,
                   error_message, created_at, processed_at
            FROM webhook_events
            WHERE idempotency_key = $1
            "#,
        )
        .bind(&record.idempotency_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to read webhook event: {}", e)))?;

        Ok(InsertOutcome::AlreadyExists(row.try_into()?))
    }

    async fn mark_completed(
        &self,
        idempotency_key: &str,
        note: Option<String>,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE webhook_events
            SET status = 'completed', error_message = $2, processed_at = $3
            WHERE idempotency_key = $1
            "#,
        )
        .bind(idempotency_key)
        .bind(note)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to complete webhook event: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("webhook event", idempotency_key));
        }
        Ok(())
    }

    async fn mark_failed(&self, idempotency_key: &str, error: String) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE webhook_events
            SET status = 'failed', error_message = $2, processed_at = $3
            WHERE idempotency_key = $1
            "#,
        )
        .bind(idempotency_key)
        .bind(error)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::Storage(format!("failed to fail webhook event: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("webhook event", idempotency_key));
        }
        Ok(())
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LedgerError> {
        let result = sqlx::query("DELETE FROM webhook_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| LedgerError::Storage(format!("failed to prune webhook events: {}", e)))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_conversion_parses_status() {
        let row = WebhookEventRow {
            idempotency_key: "key".to_string(),
            event_type: "PAYMENT_CONFIRMED".to_string(),
            payment_id: "pay_1".to_string(),
            status: "completed".to_string(),
            error_message: None,
            created_at: Utc::now(),
            processed_at: Some(Utc::now()),
        };

        let record = WebhookEventRecord::try_from(row).unwrap();
        assert_eq!(record.status, WebhookEventStatus::Completed);
    }

    #[test]
    fn row_conversion_rejects_unknown_status() {
        let row = WebhookEventRow {
            idempotency_key: "key".to_string(),
            event_type: "PAYMENT_CONFIRMED".to_string(),
            payment_id: "pay_1".to_string(),
            status: "retrying".to_string(),
            error_message: None,
            created_at: Utc::now(),
            processed_at: None,
        };

        assert!(WebhookEventRecord::try_from(row).is_err());
    }
}
