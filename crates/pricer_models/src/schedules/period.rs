//! Accrual period.

use pricer_core::types::time::{Date, DayCountConvention};

/// One accrual period of a payment schedule.
///
/// Payment falls on the accrual end date (no business-day adjustment;
/// calendars are out of scope for this library).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl Period {
    /// Creates a period from accrual start/end dates.
    pub fn new(start: Date, end: Date, day_count: DayCountConvention) -> Self {
        Self {
            start,
            end,
            day_count,
        }
    }

    /// Accrual start date.
    #[inline]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Accrual end date (also the payment date).
    #[inline]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Payment date.
    #[inline]
    pub fn payment(&self) -> Date {
        self.end
    }

    /// Day count convention for this period.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Accrual year fraction under the period's day count.
    #[inline]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }

    /// True when `date` lies in `[start, end)`.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period() -> Period {
        Period::new(
            Date::from_ymd(2026, 3, 20).unwrap(),
            Date::from_ymd(2026, 6, 20).unwrap(),
            DayCountConvention::Actual360,
        )
    }

    #[test]
    fn year_fraction_quarterly_act360() {
        let yf = period().year_fraction();
        assert!((yf - 92.0 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn contains_is_half_open() {
        let p = period();
        assert!(p.contains(p.start()));
        assert!(!p.contains(p.end()));
    }
}
