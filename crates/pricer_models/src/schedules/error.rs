//! Schedule generation error types.

use pricer_core::types::time::Date;
use pricer_core::types::DateError;
use thiserror::Error;

/// Errors from schedule and time-grid generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Start date must be before end date.
    #[error("Start date {start} must be before end date {end}")]
    InvalidDateRange {
        /// The start date.
        start: Date,
        /// The end date.
        end: Date,
    },

    /// Missing required field in a builder.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A step of zero length would never terminate.
    #[error("Step size must be positive")]
    ZeroStep,

    /// Date arithmetic overflow.
    #[error("Date arithmetic failed: {0}")]
    Date(#[from] DateError),
}
