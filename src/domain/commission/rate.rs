//! Commission rates.
//!
//! A rate maps a product category to either a percentage of the order amount
//! or a fixed fee, optionally clamped between a minimum and maximum
//! commission. Bounds are validated when the rate is written, never when it
//! is applied.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CategoryId, LedgerError, RateId};

/// How the commission is computed from the order amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// Commission is `order_amount * commission_value` (value in `(0, 1]`).
    Percentage,
    /// Commission is `commission_value` regardless of order amount.
    Fixed,
}

impl CommissionType {
    /// Stable string form used by storage adapters.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommissionType::Percentage => "percentage",
            CommissionType::Fixed => "fixed",
        }
    }

    /// Parses the storage string form.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "percentage" => Ok(CommissionType::Percentage),
            "fixed" => Ok(CommissionType::Fixed),
            other => Err(LedgerError::validation(
                "commission_type",
                format!("unknown commission type '{}'", other),
            )),
        }
    }
}

/// An active or retired commission rule for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRate {
    pub id: RateId,
    pub category_id: CategoryId,
    pub commission_type: CommissionType,
    pub commission_value: Decimal,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommissionRate {
    /// Creates a new active rate, validating value and bounds.
    pub fn new(
        category_id: CategoryId,
        commission_type: CommissionType,
        commission_value: Decimal,
        min_amount: Option<Decimal>,
        max_amount: Option<Decimal>,
    ) -> Result<Self, LedgerError> {
        let now = Utc::now();
        let rate = Self {
            id: RateId::new(),
            category_id,
            commission_type,
            commission_value,
            min_amount,
            max_amount,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Write-time validation of value and bounds.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match self.commission_type {
            CommissionType::Percentage => {
                if self.commission_value <= Decimal::ZERO || self.commission_value > Decimal::ONE {
                    return Err(LedgerError::validation(
                        "commission_value",
                        format!(
                            "percentage must be within (0, 1], got {}",
                            self.commission_value
                        ),
                    ));
                }
            }
            CommissionType::Fixed => {
                if self.commission_value <= Decimal::ZERO {
                    return Err(LedgerError::validation(
                        "commission_value",
                        "fixed commission must be positive",
                    ));
                }
            }
        }

        for (field, bound) in [("min_amount", self.min_amount), ("max_amount", self.max_amount)] {
            if let Some(bound) = bound {
                if bound < Decimal::ZERO {
                    return Err(LedgerError::validation(field, "bound cannot be negative"));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min >= max {
                return Err(LedgerError::validation(
                    "min_amount",
                    format!("min_amount ({}) must be below max_amount ({})", min, max),
                ));
            }
        }

        Ok(())
    }

    /// Computes the commission for an order amount and clamps it to the
    /// configured bounds. Deterministic: identical inputs yield identical
    /// amounts.
    pub fn apply(&self, order_amount: Decimal) -> Decimal {
        let raw = match self.commission_type {
            CommissionType::Percentage => order_amount * self.commission_value,
            CommissionType::Fixed => self.commission_value,
        };
        let floored = match self.min_amount {
            Some(min) => raw.max(min),
            None => raw,
        };
        match self.max_amount {
            Some(max) => floored.min(max),
            None => floored,
        }
    }

    /// Soft-retires the rate instead of deleting it.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn percentage_rate(value: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> CommissionRate {
        CommissionRate::new(CategoryId::new(), CommissionType::Percentage, value, min, max)
            .unwrap()
    }

    #[test]
    fn percentage_applies_to_order_amount() {
        let rate = percentage_rate(dec!(0.10), None, None);
        assert_eq!(rate.apply(dec!(250.00)), dec!(25.0000));
    }

    #[test]
    fn fixed_ignores_order_amount() {
        let rate = CommissionRate::new(
            CategoryId::new(),
            CommissionType::Fixed,
            dec!(7.50),
            None,
            None,
        )
        .unwrap();
        assert_eq!(rate.apply(dec!(10.00)), dec!(7.50));
        assert_eq!(rate.apply(dec!(99999.00)), dec!(7.50));
    }

    #[test]
    fn clamps_to_configured_bounds() {
        // electronics scenario: 10% of 10000 clamps from 1000 down to 500
        let rate = percentage_rate(dec!(0.10), Some(dec!(5)), Some(dec!(500)));
        assert_eq!(rate.apply(dec!(10000)), dec!(500));
        assert_eq!(rate.apply(dec!(10)), dec!(5));
        assert_eq!(rate.apply(dec!(1000)), dec!(100.00));
    }

    #[test]
    fn single_bound_clamps_independently() {
        let floor_only = percentage_rate(dec!(0.05), Some(dec!(2)), None);
        assert_eq!(floor_only.apply(dec!(10)), dec!(2));

        let ceiling_only = percentage_rate(dec!(0.05), None, Some(dec!(3)));
        assert_eq!(ceiling_only.apply(dec!(1000)), dec!(3));
    }

    #[test]
    fn rejects_percentage_outside_unit_interval() {
        for bad in [dec!(0), dec!(-0.1), dec!(1.01)] {
            let result = CommissionRate::new(
                CategoryId::new(),
                CommissionType::Percentage,
                bad,
                None,
                None,
            );
            assert!(result.is_err(), "accepted percentage {}", bad);
        }
        // exactly 1.0 (100%) is allowed
        assert!(CommissionRate::new(
            CategoryId::new(),
            CommissionType::Percentage,
            dec!(1),
            None,
            None
        )
        .is_ok());
    }

    #[test]
    fn rejects_non_positive_fixed_value() {
        let result =
            CommissionRate::new(CategoryId::new(), CommissionType::Fixed, dec!(0), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_inverted_or_equal_bounds() {
        for (min, max) in [(dec!(10), dec!(5)), (dec!(10), dec!(10))] {
            let result = CommissionRate::new(
                CategoryId::new(),
                CommissionType::Percentage,
                dec!(0.1),
                Some(min),
                Some(max),
            );
            assert!(result.is_err(), "accepted min={} max={}", min, max);
        }
    }

    #[test]
    fn rejects_negative_bounds() {
        let result = CommissionRate::new(
            CategoryId::new(),
            CommissionType::Percentage,
            dec!(0.1),
            Some(dec!(-1)),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn deactivate_retires_without_deleting() {
        let mut rate = percentage_rate(dec!(0.1), None, None);
        rate.deactivate();
        assert!(!rate.is_active);
    }

    #[test]
    fn type_string_roundtrip() {
        for ty in [CommissionType::Percentage, CommissionType::Fixed] {
            assert_eq!(CommissionType::parse(ty.as_str()).unwrap(), ty);
        }
        assert!(CommissionType::parse("tiered").is_err());
    }

    proptest! {
        // apply() is deterministic and its result always respects the bounds
        #[test]
        fn apply_is_deterministic_and_bounded(
            amount_cents in 1u64..10_000_000,
            value_bp in 1u32..=10_000,
            min_cents in 0u64..50_000,
            spread_cents in 1u64..100_000,
        ) {
            let amount = Decimal::new(amount_cents as i64, 2);
            let value = Decimal::new(value_bp as i64, 4);
            let min = Decimal::new(min_cents as i64, 2);
            let max = min + Decimal::new(spread_cents as i64, 2);
            let rate = percentage_rate(value, Some(min), Some(max));

            let first = rate.apply(amount);
            let second = rate.apply(amount);
            prop_assert_eq!(first, second);
            prop_assert!(first >= min);
            prop_assert!(first <= max);
        }
    }
}
