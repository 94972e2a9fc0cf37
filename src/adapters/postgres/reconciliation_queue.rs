//! PostgreSQL implementation of ReconciliationQueue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{LedgerError, PayoutId, StoreId};
use crate::ports::{ReconciliationQueue, ReconciliationTask};

pub struct PostgresReconciliationQueue {
    pool: PgPool,
}

impl PostgresReconciliationQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    payout_id: Uuid,
    store_id: Uuid,
    period: String,
    error: String,
    enqueued_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for ReconciliationTask {
    type Error = LedgerError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(ReconciliationTask {
            id: row.id,
            payout_id: PayoutId::from_uuid(row.payout_id),
            store_id: StoreId::from_uuid(row.store_id),
            period: row.period.parse()?,
            error: row.error,
            enqueued_at: row.enqueued_at,
        })
    }
}

#[async_trait]
impl ReconciliationQueue for PostgresReconciliationQueue {
    async fn enqueue(&self, task: ReconciliationTask) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO payout_reconciliation_tasks (
                id, payout_id, store_id, period, error, enqueued_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(task.id)
        .bind(task.payout_id.as_uuid())
        .bind(task.store_id.as_uuid())
        .bind(task.period.to_string())
        .bind(&task.error)
        .bind(task.enqueued_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            LedgerError::Storage(format!("failed to enqueue reconciliation task: {}", e))
        })?;

        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<ReconciliationTask>, LedgerError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            r#"
            SELECT id, payout_id, store_id, period, error, enqueued_at
            FROM payout_reconciliation_tasks
            ORDER BY enqueued_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            LedgerError::Storage(format!("failed to list reconciliation tasks: {}", e))
        })?;

        rows.into_iter().map(ReconciliationTask::try_from).collect()
    }

    async fn mark_resolved(&self, id: &Uuid) -> Result<(), LedgerError> {
        let result = sqlx::query("DELETE FROM payout_reconciliation_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                LedgerError::Storage(format!("failed to resolve reconciliation task: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("reconciliation task", id));
        }
        Ok(())
    }
}
