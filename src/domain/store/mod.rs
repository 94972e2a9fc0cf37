//! Store context - Seller subscription state.
//!
//! Stores themselves are managed elsewhere; the engine reads them to gate
//! commission recording and flips their subscription status from gateway
//! webhook effects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{LedgerError, StoreId};

/// Subscription standing of a seller on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Awaiting first payment confirmation.
    Pending,
    /// In good standing; orders accrue commission.
    Active,
    /// Cancelled after an overdue or refunded charge.
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "pending" => Ok(SubscriptionStatus::Pending),
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            other => Err(LedgerError::validation(
                "subscription_status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

/// A seller, as far as the commission engine cares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    /// Customer id assigned by the payment gateway.
    pub gateway_customer_id: Option<String>,
    /// Recurring subscription id at the payment gateway.
    pub gateway_subscription_id: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    /// True when new orders for this store may accrue commission.
    pub fn accepts_commission(&self) -> bool {
        self.subscription_status == SubscriptionStatus::Active
    }
}
