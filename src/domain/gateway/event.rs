//! Parsed gateway webhook events.
//!
//! The gateway posts loosely-typed JSON bodies of the shape
//! `{"event": "...", "payment": {"id": "..."}, "dateCreated": "..."}`.
//! Parsing models the known event names as a tagged union with an explicit
//! `Unknown` fallback, which is acknowledged rather than treated as an error.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::foundation::LedgerError;

/// Known gateway notification kinds, with a fallback for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayEventKind {
    PaymentCreated,
    PaymentReceived,
    PaymentConfirmed,
    PaymentOverdue,
    PaymentRefunded,
    Unknown(String),
}

impl GatewayEventKind {
    fn parse(name: &str) -> Self {
        match name {
            "PAYMENT_CREATED" => GatewayEventKind::PaymentCreated,
            "PAYMENT_RECEIVED" => GatewayEventKind::PaymentReceived,
            "PAYMENT_CONFIRMED" => GatewayEventKind::PaymentConfirmed,
            "PAYMENT_OVERDUE" => GatewayEventKind::PaymentOverdue,
            "PAYMENT_REFUNDED" => GatewayEventKind::PaymentRefunded,
            other => GatewayEventKind::Unknown(other.to_string()),
        }
    }

    /// The raw event name as delivered by the gateway.
    pub fn as_str(&self) -> &str {
        match self {
            GatewayEventKind::PaymentCreated => "PAYMENT_CREATED",
            GatewayEventKind::PaymentReceived => "PAYMENT_RECEIVED",
            GatewayEventKind::PaymentConfirmed => "PAYMENT_CONFIRMED",
            GatewayEventKind::PaymentOverdue => "PAYMENT_OVERDUE",
            GatewayEventKind::PaymentRefunded => "PAYMENT_REFUNDED",
            GatewayEventKind::Unknown(name) => name,
        }
    }
}

/// Raw webhook body shape.
#[derive(Debug, Deserialize)]
struct RawWebhookBody {
    event: String,
    payment: Option<RawPayment>,
    #[serde(rename = "dateCreated")]
    date_created: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPayment {
    id: Option<String>,
}

/// A validated gateway notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayEvent {
    pub kind: GatewayEventKind,
    pub payment_id: String,
    /// Gateway-supplied creation timestamp, verbatim; part of the event's
    /// identity for idempotency purposes.
    pub date_created: String,
}

impl GatewayEvent {
    /// Parses a webhook body. The signature MUST have been verified against
    /// the raw bytes before this is called.
    ///
    /// `fallback_timestamp` stands in for a missing `dateCreated` so the
    /// derived idempotency key is still well-defined.
    pub fn parse(body: &[u8], fallback_timestamp: &str) -> Result<Self, LedgerError> {
        let raw: RawWebhookBody = serde_json::from_slice(body).map_err(|e| {
            LedgerError::validation("body", format!("malformed webhook payload: {}", e))
        })?;

        let payment_id = raw
            .payment
            .and_then(|p| p.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| LedgerError::validation("payment.id", "missing payment id"))?;

        Ok(Self {
            kind: GatewayEventKind::parse(&raw.event),
            payment_id,
            date_created: raw
                .date_created
                .unwrap_or_else(|| fallback_timestamp.to_string()),
        })
    }

    /// Deterministic identity of this logical event.
    ///
    /// Two deliveries of the same `(event, payment id, creation timestamp)`
    /// hash to the same key; the unique insert on this key is what makes
    /// redelivery safe.
    pub fn idempotency_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(self.payment_id.as_bytes());
        hasher.update(b":");
        hasher.update(self.date_created.as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
