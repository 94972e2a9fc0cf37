//! Commission ledger transactions.
//!
//! One entry per qualifying order. Entries are written as `calculated` and
//! only the payout-completion cascade may flip them to `paid`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError, OrderId, RateId, StoreId, TransactionId};

/// Lifecycle of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Commission computed, awaiting a payout.
    Calculated,
    /// Settled by a completed payout. Terminal.
    Paid,
    /// Excluded from settlement (refunded/voided order). Terminal.
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Calculated => "calculated",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "calculated" => Ok(TransactionStatus::Calculated),
            "paid" => Ok(TransactionStatus::Paid),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(LedgerError::validation(
                "status",
                format!("unknown transaction status '{}'", other),
            )),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One computed commission amount tied to a single order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionTransaction {
    pub id: TransactionId,
    pub store_id: StoreId,
    pub category_id: CategoryId,
    pub order_id: OrderId,
    pub rate_id: RateId,
    pub order_amount: Decimal,
    /// Snapshot of the rate value that produced `commission_amount`.
    pub commission_rate_applied: Decimal,
    pub commission_amount: Decimal,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl CommissionTransaction {
    /// Records the commission for an order by applying the resolved rate.
    pub fn record(
        store_id: StoreId,
        order_id: OrderId,
        order_amount: Decimal,
        rate: &CommissionRate,
    ) -> Result<Self, LedgerError> {
        if order_amount <= Decimal::ZERO {
            return Err(LedgerError::validation(
                "order_amount",
                "order amount must be positive",
            ));
        }
        Ok(Self {
            id: TransactionId::new(),
            store_id,
            category_id: rate.category_id,
            order_id,
            rate_id: rate.id,
            order_amount,
            commission_rate_applied: rate.commission_value,
            commission_amount: rate.apply(order_amount),
            status: TransactionStatus::Calculated,
            created_at: Utc::now(),
            paid_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commission::CommissionType;
    use rust_decimal_macros::dec;

    fn test_rate() -> CommissionRate {
        CommissionRate::new(
            CategoryId::new(),
            CommissionType::Percentage,
            dec!(0.10),
            Some(dec!(5)),
            Some(dec!(500)),
        )
        .unwrap()
    }

    #[test]
    fn record_snapshots_rate_and_computes_amount() {
        let rate = test_rate();
        let txn = CommissionTransaction::record(
            StoreId::new(),
            OrderId::new(),
            dec!(10000),
            &rate,
        )
        .unwrap();

        assert_eq!(txn.status, TransactionStatus::Calculated);
        assert_eq!(txn.commission_rate_applied, dec!(0.10));
        assert_eq!(txn.commission_amount, dec!(500));
        assert_eq!(txn.rate_id, rate.id);
        assert_eq!(txn.category_id, rate.category_id);
        assert!(txn.paid_at.is_none());
    }

    #[test]
    fn record_rejects_non_positive_order_amount() {
        let rate = test_rate();
        for amount in [dec!(0), dec!(-10)] {
            let result =
                CommissionTransaction::record(StoreId::new(), OrderId::new(), amount, &rate);
            assert!(result.is_err(), "accepted amount {}", amount);
        }
    }

    #[test]
    fn status_string_roundtrip() {
        for status in [
            TransactionStatus::Calculated,
            TransactionStatus::Paid,
            TransactionStatus::Cancelled,
        ] {
            assert_eq!(TransactionStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(TransactionStatus::parse("settled").is_err());
    }
}
