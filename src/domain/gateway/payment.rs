//! The gateway's view of a payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Received,
    Confirmed,
    Overdue,
    Refunded,
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// True when the payment settles the referenced subscription charge.
    pub fn settles(&self) -> bool {
        matches!(self, PaymentStatus::Received | PaymentStatus::Confirmed)
    }

    /// True when the payment revokes a previously granted subscription.
    pub fn revokes(&self) -> bool {
        matches!(self, PaymentStatus::Overdue | PaymentStatus::Refunded)
    }
}

/// Payment details fetched from the gateway during webhook processing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GatewayPayment {
    pub id: String,
    /// Gateway customer the payment belongs to.
    pub customer: String,
    /// Gateway subscription the payment settles, when recurring.
    pub subscription: Option<String>,
    pub status: PaymentStatus,
    pub value: Decimal,
}

impl GatewayPayment {
    /// The reference used to locate the local store this payment concerns:
    /// the subscription when present, the customer otherwise.
    pub fn store_reference(&self) -> &str {
        self.subscription.as_deref().unwrap_or(&self.customer)
    }
}
