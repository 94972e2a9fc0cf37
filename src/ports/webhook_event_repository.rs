//! WebhookEventRepository port - Idempotency records for gateway webhooks.
//!
//! The gateway may deliver the same notification multiple times (network
//! timeouts, 5xx responses from our endpoint, lost acks). Each logical event
//! is recorded under a deterministic idempotency key; the unique insert on
//! that key is the concurrency mutex that guarantees at-most-once processing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::LedgerError;

/// Processing state of a webhook event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventStatus {
    /// Inserted before side effects run; a crash leaves the record here.
    Processing,
    /// Side effects applied (or deliberately skipped).
    Completed,
    /// Side effects raised; the error is captured on the record.
    Failed,
}

impl WebhookEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventStatus::Processing => "processing",
            WebhookEventStatus::Completed => "completed",
            WebhookEventStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "processing" => Ok(WebhookEventStatus::Processing),
            "completed" => Ok(WebhookEventStatus::Completed),
            "failed" => Ok(WebhookEventStatus::Failed),
            other => Err(LedgerError::validation(
                "status",
                format!("unknown webhook event status '{}'", other),
            )),
        }
    }
}

/// Audit/idempotency record of one logical gateway event.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEventRecord {
    pub idempotency_key: String,
    pub event_type: String,
    pub payment_id: String,
    pub status: WebhookEventStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl WebhookEventRecord {
    /// Creates the `processing` record inserted before side effects run.
    pub fn processing(
        idempotency_key: impl Into<String>,
        event_type: impl Into<String>,
        payment_id: impl Into<String>,
    ) -> Self {
        Self {
            idempotency_key: idempotency_key.into(),
            event_type: event_type.into(),
            payment_id: payment_id.into(),
            status: WebhookEventStatus::Processing,
            error_message: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }
}

/// Result of attempting to insert an idempotency record.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// First delivery of this logical event; side effects may run.
    Inserted,
    /// The key already exists; the stored record carries the prior outcome.
    AlreadyExists(WebhookEventRecord),
}

/// Port for webhook idempotency records.
///
/// Implementations must make `insert_processing` race-safe: of two
/// concurrent inserts for the same key, exactly one returns `Inserted`
/// (a unique constraint in Postgres, a map entry under a single lock in
/// memory).
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    async fn insert_processing(
        &self,
        record: WebhookEventRecord,
    ) -> Result<InsertOutcome, LedgerError>;

    /// Marks the event completed. `note` records why a completed event was
    /// a no-op (unknown event type, unmatched reference).
    async fn mark_completed(
        &self,
        idempotency_key: &str,
        note: Option<String>,
    ) -> Result<(), LedgerError>;

    /// Marks the event failed with the error captured.
    async fn mark_failed(&self, idempotency_key: &str, error: String) -> Result<(), LedgerError>;

    /// Deletes records older than the cutoff; retention is driven by an
    /// external scheduler. Returns the number of records deleted.
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> Result<u64, LedgerError>;
}
