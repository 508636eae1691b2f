//! Valuation time grid.
//!
//! The simulation engine evaluates conditional payoffs on a deterministic
//! date grid walked at a fixed step from the settle date to maturity. The
//! grid always ends with the maturity date; when the last regular step
//! lands exactly on maturity the date appears twice, and every consumer
//! treats the zero-length final interval as empty rather than an error.

use pricer_core::types::time::{Date, DayCountConvention};

use super::error::ScheduleError;

/// Unit of the grid step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepUnit {
    /// Calendar days.
    Days,
    /// Calendar months (end-of-month clamped).
    Months,
    /// Calendar years.
    Years,
}

/// Monotone date grid from a start date to maturity.
///
/// # Example
///
/// ```
/// use pricer_models::schedules::{StepUnit, TimeGridBuilder};
/// use pricer_core::types::time::Date;
///
/// let grid = TimeGridBuilder::new()
///     .start(Date::from_ymd(2026, 3, 20).unwrap())
///     .maturity(Date::from_ymd(2027, 3, 20).unwrap())
///     .step(6, StepUnit::Months)
///     .build()
///     .unwrap();
///
/// // start, +6m, maturity appended (lands on the +12m step exactly,
/// // so the final date is duplicated and the last interval is empty)
/// assert_eq!(grid.len(), 4);
/// assert_eq!(*grid.dates().last().unwrap(), Date::from_ymd(2027, 3, 20).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeGrid {
    dates: Vec<Date>,
}

impl TimeGrid {
    /// The grid dates, non-decreasing, last equal to maturity.
    #[inline]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Number of grid dates (intervals are `len() - 1`).
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the grid holds no dates (never produced by the builder).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Year fractions of every grid date measured from `as_of`.
    ///
    /// The result is non-decreasing; duplicated dates map to equal times.
    pub fn year_fractions(&self, as_of: Date, day_count: DayCountConvention) -> Vec<f64> {
        self.dates
            .iter()
            .map(|&d| day_count.year_fraction(as_of, d))
            .collect()
    }
}

/// Builder for [`TimeGrid`].
///
/// The step defaults to 3 months when unset. Grid construction walks from
/// the start date one step at a time; a step that overshoots maturity is
/// clamped, and maturity is always appended as the final element.
/// `start >= maturity` produces the single-date grid `[maturity]`.
#[derive(Debug, Clone, Default)]
pub struct TimeGridBuilder {
    start: Option<Date>,
    maturity: Option<Date>,
    step: Option<(u32, StepUnit)>,
}

impl TimeGridBuilder {
    /// Default grid step: 3 months.
    pub const DEFAULT_STEP: (u32, StepUnit) = (3, StepUnit::Months);

    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first grid date (normally the settle date).
    pub fn start(mut self, date: Date) -> Self {
        self.start = Some(date);
        self
    }

    /// Sets the maturity date (always the final grid element).
    pub fn maturity(mut self, date: Date) -> Self {
        self.maturity = Some(date);
        self
    }

    /// Sets the step size and unit.
    pub fn step(mut self, size: u32, unit: StepUnit) -> Self {
        self.step = Some((size, unit));
        self
    }

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// - [`ScheduleError::MissingField`] when start or maturity are unset
    /// - [`ScheduleError::ZeroStep`] for a zero step size
    /// - [`ScheduleError::Date`] on date arithmetic overflow
    pub fn build(self) -> Result<TimeGrid, ScheduleError> {
        let start = self.start.ok_or(ScheduleError::MissingField { field: "start" })?;
        let maturity = self
            .maturity
            .ok_or(ScheduleError::MissingField { field: "maturity" })?;
        let (size, unit) = self.step.unwrap_or(Self::DEFAULT_STEP);
        if size == 0 {
            return Err(ScheduleError::ZeroStep);
        }

        let mut dates = Vec::new();
        if start < maturity {
            dates.push(start);
            let mut steps = 1u32;
            loop {
                // Step from the anchor so month-end clamping never drifts.
                let advanced = match unit {
                    StepUnit::Days => start.add_days(u64::from(size) * u64::from(steps))?,
                    StepUnit::Months => start.add_months(size * steps)?,
                    StepUnit::Years => start.add_months(12 * size * steps)?,
                };
                if advanced > maturity {
                    break;
                }
                dates.push(advanced);
                if advanced == maturity {
                    break;
                }
                steps += 1;
            }
        }
        // Maturity is always the final element, even when a step landed on
        // it exactly; consumers treat the zero-length interval as empty.
        dates.push(maturity);

        Ok(TimeGrid { dates })
    }
}
