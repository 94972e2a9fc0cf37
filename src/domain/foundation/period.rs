//! Billing period value object.
//!
//! A payout covers one calendar month, written `YYYY-MM`. The period supplies
//! the date bounds used both when aggregating transactions into a payout and
//! when cascading a completed payout back onto the ledger.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::LedgerError;

/// A calendar-month billing period, e.g. `2025-01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod {
    year: i32,
    month: u32,
}

impl BillingPeriod {
    /// Creates a period from year and month, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(
                "period",
                format!("month must be 1-12, got {}", month),
            ));
        }
        if !(2000..=9999).contains(&year) {
            return Err(LedgerError::validation(
                "period",
                format!("year out of range: {}", year),
            ));
        }
        Ok(Self { year, month })
    }

    /// The period containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Inclusive start of the period (first calendar day, midnight UTC).
    pub fn start(&self) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("validated year/month always forms a date");
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
    }

    /// Exclusive end of the period (first day of the following month).
    pub fn end(&self) -> DateTime<Utc> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .expect("validated year/month always forms a date");
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
    }

    /// True when the instant falls within this period.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at < self.end()
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillingPeriod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::validation("period", format!("expected YYYY-MM, got '{}'", s));
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_valid_period() {
        let period: BillingPeriod = "2025-01".parse().unwrap();
        assert_eq!(period.year(), 2025);
        assert_eq!(period.month(), 1);
        assert_eq!(period.to_string(), "2025-01");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["2025", "2025-13", "2025-00", "25-01", "2025-1", "jan-2025", ""] {
            assert!(bad.parse::<BillingPeriod>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn bounds_cover_first_through_last_day() {
        let period: BillingPeriod = "2025-01".parse().unwrap();
        assert_eq!(period.start(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(period.end(), Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

        assert!(period.contains(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert!(period.contains(Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap()));
        assert!(!period.contains(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        let period: BillingPeriod = "2024-12".parse().unwrap();
        assert_eq!(period.end(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn containing_picks_the_right_month() {
        let at = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(BillingPeriod::containing(at).to_string(), "2025-03");
    }
}
