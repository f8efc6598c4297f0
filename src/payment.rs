//! Cash flow value types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per year used for time fractions (ACT/365 fixed, not 365.25)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A single dated cash flow
///
/// Negative amounts are outflows (investments), positive amounts are
/// inflows (returns). Equality and ordering are by value; a payment has
/// no identity beyond its two fields.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Payment {
    /// Calendar date of the flow (no time-of-day component)
    pub date: NaiveDate,
    /// Signed monetary amount
    pub amount: f64,
}

impl Payment {
    /// Create a new payment
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Time from `base` to this payment in fractional years
    ///
    /// Measured in whole days over a fixed 365-day year. This matches the
    /// discounting basis of the solver and is a deliberate simplification,
    /// not calendar-accurate compounding.
    pub fn year_fraction(&self, base: NaiveDate) -> f64 {
        (self.date - base).num_days() as f64 / DAYS_PER_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_fraction() {
        let base = date(2019, 1, 1);

        let p = Payment::new(date(2020, 1, 1), 100.0);
        assert!((p.year_fraction(base) - 1.0).abs() < 1e-12);

        // Half a (non-leap) year: 182 days
        let p = Payment::new(date(2019, 7, 2), 100.0);
        assert!((p.year_fraction(base) - 182.0 / 365.0).abs() < 1e-12);

        // A payment on the base date has zero elapsed time
        let p = Payment::new(base, -50.0);
        assert_eq!(p.year_fraction(base), 0.0);
    }

    #[test]
    fn test_year_fraction_leap_span() {
        // 2020 is a leap year, so Jan 1 to Jan 1 is 366 days over a 365-day basis
        let base = date(2020, 1, 1);
        let p = Payment::new(date(2021, 1, 1), 100.0);
        assert!((p.year_fraction(base) - 366.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_value_equality() {
        let a = Payment::new(date(2020, 3, 15), 250.0);
        let b = Payment::new(date(2020, 3, 15), 250.0);
        let c = Payment::new(date(2020, 3, 15), -250.0);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
