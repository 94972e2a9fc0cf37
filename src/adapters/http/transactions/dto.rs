//! Wire types for the commission-transaction endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::commission::{CommissionTransaction, TransactionStatus};
use crate::domain::foundation::{CategoryId, LedgerError, OrderId, StoreId};
use crate::ports::TransactionFilter;

/// Body for `POST /` - the order-completion entry point.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionRequest {
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub order_id: OrderId,
    pub order_amount: Decimal,
}

/// Query for `GET /` - reporting filters.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(default)]
    pub store_id: Option<StoreId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_from: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_until: Option<DateTime<Utc>>,
}

impl ListTransactionsQuery {
    pub fn into_filter(self) -> Result<TransactionFilter, LedgerError> {
        Ok(TransactionFilter {
            store_id: self.store_id,
            status: self.status.as_deref().map(TransactionStatus::parse).transpose()?,
            created_from: self.created_from,
            created_until: self.created_until,
        })
    }
}

/// Transaction representation returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub store_id: String,
    pub category_id: String,
    pub order_id: String,
    pub order_amount: Decimal,
    pub commission_rate_applied: Decimal,
    pub commission_amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<CommissionTransaction> for TransactionResponse {
    fn from(txn: CommissionTransaction) -> Self {
        Self {
            id: txn.id.to_string(),
            store_id: txn.store_id.to_string(),
            category_id: txn.category_id.to_string(),
            order_id: txn.order_id.to_string(),
            order_amount: txn.order_amount,
            commission_rate_applied: txn.commission_rate_applied,
            commission_amount: txn.commission_amount,
            status: txn.status,
            created_at: txn.created_at,
            paid_at: txn.paid_at,
        }
    }
}
