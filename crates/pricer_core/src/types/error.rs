//! Error types for structured error handling.
//!
//! This module provides:
//! - [`DateError`]: errors from date construction and parsing
//! - [`InterpolationError`]: errors from interpolation operations
//! - [`PricingError`]: errors from valuation operations, including the
//!   fail-fast `InvalidState` raised when scenario-dependent state is
//!   queried before it has been conditioned

use thiserror::Error;

/// Date construction and parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Invalid date components (e.g., February 30th).
    #[error("Invalid date: {year}-{month}-{day}")]
    InvalidDate {
        /// Year component.
        year: i32,
        /// Month component (1-12).
        month: u32,
        /// Day component (1-31).
        day: u32,
    },

    /// Failed to parse a date string.
    #[error("Date parse error: {0}")]
    ParseError(String),

    /// Date arithmetic left the representable range.
    #[error("Date arithmetic overflow: {0}")]
    Overflow(String),
}

/// Interpolation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    /// Not enough data points to interpolate.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided.
        got: usize,
        /// Minimum number of points required.
        need: usize,
    },

    /// Mismatched or otherwise invalid input arrays.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Categorised valuation errors.
///
/// # Variants
/// - `InvalidInput`: invalid market data or parameters, rejected eagerly
/// - `InvalidState`: a scenario-dependent query was issued before the state
///   it depends on was conditioned (programming error, fails fast)
/// - `NumericalInstability`: a computation produced a non-finite or
///   out-of-range intermediate
/// - `ModelFailure`: model assumptions violated
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Scenario state queried before being conditioned.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),

    /// Model failed to produce a valid result.
    #[error("Model failure: {0}")]
    ModelFailure(String),
}
