//! Payment schedule generation.

use pricer_core::types::time::{Date, DayCountConvention};

use super::error::ScheduleError;
use super::frequency::Frequency;
use super::period::Period;

/// An ordered sequence of accrual periods.
///
/// Built with [`ScheduleBuilder`]; the final period is shortened when the
/// frequency does not divide the start/end span evenly.
///
/// # Example
///
/// ```
/// use pricer_models::schedules::{Frequency, ScheduleBuilder};
/// use pricer_core::types::time::Date;
///
/// let schedule = ScheduleBuilder::new()
///     .start(Date::from_ymd(2026, 3, 20).unwrap())
///     .end(Date::from_ymd(2031, 3, 20).unwrap())
///     .frequency(Frequency::Quarterly)
///     .build()
///     .unwrap();
///
/// assert_eq!(schedule.len(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    periods: Vec<Period>,
}

impl Schedule {
    /// Wraps pre-built periods (assumed contiguous and ordered).
    pub fn new(periods: Vec<Period>) -> Self {
        Self { periods }
    }

    /// The accrual periods in order.
    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Number of periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True when the schedule has no periods.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Accrual start of the first period.
    pub fn start_date(&self) -> Date {
        self.periods[0].start()
    }

    /// Accrual end of the last period.
    pub fn end_date(&self) -> Date {
        self.periods[self.periods.len() - 1].end()
    }

    /// Iterates over the periods.
    pub fn iter(&self) -> impl Iterator<Item = &Period> {
        self.periods.iter()
    }
}

/// Builder for [`Schedule`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    start: Option<Date>,
    end: Option<Date>,
    frequency: Option<Frequency>,
    day_count: DayCountConvention,
}

impl ScheduleBuilder {
    /// Creates an empty builder (day count defaults to ACT/365F).
    pub fn new() -> Self {
        Self {
            day_count: DayCountConvention::Actual365Fixed,
            ..Default::default()
        }
    }

    /// Sets the accrual start date.
    pub fn start(mut self, date: Date) -> Self {
        self.start = Some(date);
        self
    }

    /// Sets the final accrual end date.
    pub fn end(mut self, date: Date) -> Self {
        self.end = Some(date);
        self
    }

    /// Sets the payment frequency.
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    /// Sets the day count convention.
    pub fn day_count(mut self, dc: DayCountConvention) -> Self {
        self.day_count = dc;
        self
    }

    /// Builds the schedule.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::MissingField`] when start/end/frequency are unset
    /// - [`ScheduleError::InvalidDateRange`] when `start >= end`
    /// - [`ScheduleError::Date`] on date arithmetic overflow
    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let start = self.start.ok_or(ScheduleError::MissingField { field: "start" })?;
        let end = self.end.ok_or(ScheduleError::MissingField { field: "end" })?;
        let frequency = self
            .frequency
            .ok_or(ScheduleError::MissingField { field: "frequency" })?;

        if start >= end {
            return Err(ScheduleError::InvalidDateRange { start, end });
        }

        let months = frequency.months_between_payments();
        let mut periods = Vec::new();
        let mut period_start = start;
        let mut step = 1u32;

        while period_start < end {
            // Step from the anchor date so month-end clamping never drifts.
            let raw_end = start.add_months(months * step)?;
            let period_end = if raw_end > end { end } else { raw_end };
            periods.push(Period::new(period_start, period_end, self.day_count));
            period_start = period_end;
            step += 1;
        }

        Ok(Schedule::new(periods))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn quarterly_five_years() {
        let schedule = ScheduleBuilder::new()
            .start(date(2026, 3, 20))
            .end(date(2031, 3, 20))
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();
        assert_eq!(schedule.len(), 20);
        assert_eq!(schedule.start_date(), date(2026, 3, 20));
        assert_eq!(schedule.end_date(), date(2031, 3, 20));
    }

    #[test]
    fn periods_are_contiguous() {
        let schedule = ScheduleBuilder::new()
            .start(date(2026, 1, 31))
            .end(date(2027, 1, 31))
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();
        for pair in schedule.periods().windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn final_stub_is_clamped() {
        let schedule = ScheduleBuilder::new()
            .start(date(2026, 1, 15))
            .end(date(2026, 5, 1))
            .frequency(Frequency::Quarterly)
            .build()
            .unwrap();
        // One full quarter plus a short stub.
        assert_eq!(schedule.len(), 2);
        assert_eq!(schedule.end_date(), date(2026, 5, 1));
    }

    #[test]
    fn missing_fields_error() {
        let result = ScheduleBuilder::new().start(date(2026, 1, 1)).build();
        assert!(matches!(result, Err(ScheduleError::MissingField { .. })));
    }

    #[test]
    fn reversed_range_errors() {
        let result = ScheduleBuilder::new()
            .start(date(2027, 1, 1))
            .end(date(2026, 1, 1))
            .frequency(Frequency::Annual)
            .build();
        assert!(matches!(result, Err(ScheduleError::InvalidDateRange { .. })));
    }
}
