//! Engine error types.

use pricer_core::market_data::error::MarketDataError;
use pricer_core::types::time::Date;
use pricer_core::types::PricingError;
use pricer_models::schedules::ScheduleError;
use thiserror::Error;

/// Simulation configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside `[1, 10_000_000]`.
    #[error("Invalid path count {0}: must be in [1, 10000000]")]
    InvalidPathCount(usize),

    /// A required builder field was not set.
    #[error("Missing required parameter: {name}")]
    MissingParameter {
        /// Parameter name.
        name: &'static str,
    },
}

/// Contingent-leg engine errors.
///
/// Setup-phase failures surface immediately to the caller; no partial
/// valuation results are ever returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid simulation configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Time grid construction failed.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Curve or copula input rejected.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Dynamic pricer failure.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Settle date earlier than the valuation date.
    #[error("Settle date {settle} precedes valuation date {valuation}")]
    SettleBeforeValuation {
        /// Valuation (curve anchor) date.
        valuation: Date,
        /// Settle date.
        settle: Date,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidPathCount(0);
        assert!(err.to_string().contains("path count 0"));
    }

    #[test]
    fn engine_error_wraps_config() {
        let err: EngineError = ConfigError::MissingParameter { name: "n_paths" }.into();
        assert!(err.to_string().contains("n_paths"));
    }
}
