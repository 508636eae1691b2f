//! Date type and day count conventions.
//!
//! [`Date`] is a thin newtype over [`chrono::NaiveDate`] providing the
//! calendar operations the valuation grid needs (month stepping with
//! end-of-month clamping, day offsets) and validated construction.
//! [`DayCountConvention`] converts date pairs into year fractions.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use std::fmt;
use std::ops::Sub;

use super::error::DateError;

/// Calendar date (no time component, no timezone).
///
/// # Examples
///
/// ```
/// use pricer_core::types::time::Date;
///
/// let d = Date::from_ymd(2026, 3, 20).unwrap();
/// assert_eq!(d.year(), 2026);
///
/// // Month stepping clamps to the end of a shorter month.
/// let eom = Date::from_ymd(2026, 1, 31).unwrap();
/// assert_eq!(eom.add_months(1).unwrap(), Date::from_ymd(2026, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a `Date` from year, month, and day components.
    ///
    /// Returns `Err(DateError::InvalidDate)` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    /// Returns today's date in local time.
    pub fn today() -> Self {
        Date(Local::now().date_naive())
    }

    /// Parses a date from an ISO 8601 string (`YYYY-MM-DD`).
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Date)
            .map_err(|e| DateError::ParseError(e.to_string()))
    }

    /// Returns the underlying [`NaiveDate`].
    #[inline]
    pub fn into_inner(self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day-of-month component.
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns this date advanced by `n` whole months.
    ///
    /// The day-of-month is clamped when the target month is shorter
    /// (Jan 31 + 1m = Feb 28/29).
    pub fn add_months(&self, n: u32) -> Result<Self, DateError> {
        self.0
            .checked_add_months(Months::new(n))
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} + {} months", self.0, n)))
    }

    /// Returns this date advanced by `n` whole days.
    pub fn add_days(&self, n: u64) -> Result<Self, DateError> {
        self.0
            .checked_add_days(Days::new(n))
            .map(Date)
            .ok_or_else(|| DateError::Overflow(format!("{} + {} days", self.0, n)))
    }
}

impl Sub for Date {
    type Output = i64;

    /// Difference in whole days (`self - other`); negative when `self` is earlier.
    fn sub(self, other: Date) -> i64 {
        (self.0 - other.0).num_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Day count conventions for converting date pairs into year fractions.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayCountConvention {
    /// Actual/365 Fixed: actual days / 365. The default for derivatives.
    Actual365Fixed,

    /// Actual/360: actual days / 360. Money market convention.
    Actual360,

    /// 30/360 US bond basis: months of 30 days, years of 360.
    Thirty360,
}

impl DayCountConvention {
    /// Returns the industry-standard convention name.
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Actual365Fixed => "ACT/365F",
            DayCountConvention::Actual360 => "ACT/360",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Year fraction between two dates; negative when `start > end`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_core::types::time::{Date, DayCountConvention};
    ///
    /// let start = Date::from_ymd(2026, 1, 1).unwrap();
    /// let end = Date::from_ymd(2026, 7, 1).unwrap();
    /// let yf = DayCountConvention::Actual365Fixed.year_fraction(start, end);
    /// assert!((yf - 0.4959).abs() < 1e-3);
    /// ```
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Actual365Fixed => (end - start) as f64 / 365.0,
            DayCountConvention::Actual360 => (end - start) as f64 / 360.0,
            DayCountConvention::Thirty360 => {
                let (a, b, sign) = if start <= end {
                    (start, end, 1.0)
                } else {
                    (end, start, -1.0)
                };

                let d1 = if a.day() == 31 { 30 } else { a.day() };
                let d2 = if b.day() == 31 && d1 == 30 { 30 } else { b.day() };

                let days = 360 * (b.year() - a.year())
                    + 30 * (b.month() as i32 - a.month() as i32)
                    + (d2 as i32 - d1 as i32);
                sign * days as f64 / 360.0
            }
        }
    }
}

impl Default for DayCountConvention {
    fn default() -> Self {
        DayCountConvention::Actual365Fixed
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
