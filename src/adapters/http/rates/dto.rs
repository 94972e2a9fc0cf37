//! Wire types for the commission-rate endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::handlers::RateDraft;
use crate::domain::commission::{CommissionRate, CommissionType};
use crate::domain::foundation::CategoryId;

/// Body for `POST /` and `PUT /{id}`.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub category_id: CategoryId,
    pub commission_type: CommissionType,
    pub commission_value: Decimal,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
}

impl From<RateRequest> for RateDraft {
    fn from(req: RateRequest) -> Self {
        RateDraft {
            category_id: req.category_id,
            commission_type: req.commission_type,
            commission_value: req.commission_value,
            min_amount: req.min_amount,
            max_amount: req.max_amount,
        }
    }
}

/// Rate representation returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub id: String,
    pub category_id: String,
    pub commission_type: CommissionType,
    pub commission_value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<CommissionRate> for RateResponse {
    fn from(rate: CommissionRate) -> Self {
        Self {
            id: rate.id.to_string(),
            category_id: rate.category_id.to_string(),
            commission_type: rate.commission_type,
            commission_value: rate.commission_value,
            min_amount: rate.min_amount,
            max_amount: rate.max_amount,
            is_active: rate.is_active,
            created_at: rate.created_at,
            updated_at: rate.updated_at,
        }
    }
}
