//! Payout batches.
//!
//! A payout aggregates one store's `calculated` commission for one billing
//! period. Totals are a snapshot taken at creation time, not a live view:
//! transactions recorded for the same period afterwards flow into a future
//! payout, keeping issued totals auditable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BillingPeriod, LedgerError, OperatorId, PayoutId, StoreId};
use crate::domain::payout::PayoutStatus;

/// A batched, periodic payout of a store's commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionPayout {
    pub id: PayoutId,
    pub store_id: StoreId,
    pub period: BillingPeriod,
    pub total_commission: Decimal,
    /// Currently equal to `total_commission`; no deductions are modelled.
    pub total_payout: Decimal,
    pub transaction_count: u32,
    pub status: PayoutStatus,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub processed_by: Option<OperatorId>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CommissionPayout {
    /// Creates a pending payout from the aggregated snapshot.
    ///
    /// Rejects a zero (or negative) total: there is nothing to pay.
    pub fn from_snapshot(
        store_id: StoreId,
        period: BillingPeriod,
        total_commission: Decimal,
        transaction_count: u32,
        notes: Option<String>,
    ) -> Result<Self, LedgerError> {
        if total_commission <= Decimal::ZERO {
            return Err(LedgerError::validation(
                "total_commission",
                format!("no calculated commission for {} in {}", store_id, period),
            ));
        }
        Ok(Self {
            id: PayoutId::new(),
            store_id,
            period,
            total_commission,
            total_payout: total_commission,
            transaction_count,
            status: PayoutStatus::Pending,
            payment_reference: None,
            notes,
            processed_by: None,
            processed_at: None,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_creates_pending_payout() {
        let payout = CommissionPayout::from_snapshot(
            StoreId::new(),
            "2025-01".parse().unwrap(),
            dec!(120.00),
            3,
            None,
        )
        .unwrap();

        assert_eq!(payout.status, PayoutStatus::Pending);
        assert_eq!(payout.total_commission, dec!(120.00));
        assert_eq!(payout.total_payout, dec!(120.00));
        assert_eq!(payout.transaction_count, 3);
        assert!(payout.processed_at.is_none());
        assert!(payout.processed_by.is_none());
    }

    #[test]
    fn rejects_zero_total() {
        let result = CommissionPayout::from_snapshot(
            StoreId::new(),
            "2025-01".parse().unwrap(),
            dec!(0),
            0,
            None,
        );
        assert!(matches!(result, Err(LedgerError::Validation { .. })));
    }
}
