//! Market data error types.

use crate::types::{InterpolationError, PricingError};
use thiserror::Error;

/// Market data operation errors.
///
/// Raised eagerly during curve construction and lookups so that invalid
/// configuration never reaches the simulation phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Negative time to maturity.
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The offending maturity.
        t: f64,
    },

    /// Correlation or factor loading outside `[-1, 1]`.
    #[error("Invalid correlation: {rho} not in [-1, 1]")]
    InvalidCorrelation {
        /// The offending value.
        rho: f64,
    },

    /// Recovery rate outside `[0, 1]`.
    #[error("Invalid recovery rate: {recovery} not in [0, 1]")]
    InvalidRecovery {
        /// The offending value.
        recovery: f64,
    },

    /// Query point outside the valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point.
        x: f64,
        /// Lower domain bound.
        min: f64,
        /// Upper domain bound.
        max: f64,
    },

    /// Wrapped interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Not enough data points for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided.
        got: usize,
        /// Minimum number required.
        need: usize,
    },
}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
