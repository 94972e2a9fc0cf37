//! Wire types for the payout endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BillingPeriod, StoreId};
use crate::domain::payout::{CommissionPayout, PayoutStatus};

/// Body for `POST /`.
#[derive(Debug, Deserialize)]
pub struct CreatePayoutRequest {
    pub store_id: StoreId,
    /// `YYYY-MM`; parse failures surface as 400.
    pub period: BillingPeriod,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Body for `PATCH /{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdatePayoutStatusRequest {
    pub status: PayoutStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Query for `GET /`.
#[derive(Debug, Deserialize)]
pub struct ListPayoutsQuery {
    pub store_id: StoreId,
}

/// Payout representation returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    pub id: String,
    pub store_id: String,
    pub period: String,
    pub total_commission: Decimal,
    pub total_payout: Decimal,
    pub transaction_count: u32,
    pub status: PayoutStatus,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub processed_by: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionPayout> for PayoutResponse {
    fn from(payout: CommissionPayout) -> Self {
        Self {
            id: payout.id.to_string(),
            store_id: payout.store_id.to_string(),
            period: payout.period.to_string(),
            total_commission: payout.total_commission,
            total_payout: payout.total_payout,
            transaction_count: payout.transaction_count,
            status: payout.status,
            payment_reference: payout.payment_reference,
            notes: payout.notes,
            processed_by: payout.processed_by.map(|o| o.to_string()),
            processed_at: payout.processed_at,
            created_at: payout.created_at,
        }
    }
}
