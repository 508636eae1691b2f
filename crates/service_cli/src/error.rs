//! CLI error types.

use pricer_core::market_data::error::MarketDataError;
use pricer_core::types::DateError;
use pricer_models::schedules::ScheduleError;
use pricer_pricing::mc::{ConfigError, EngineError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be read.
    #[error("Cannot read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid date argument.
    #[error("Invalid date: {0}")]
    Date(#[from] DateError),

    /// Schedule construction failed.
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Market data input rejected.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Simulation configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine failure.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Convenience result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
