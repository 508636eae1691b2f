//! Contingent-leg simulation kernel.
//!
//! # Architecture
//!
//! ```text
//! ContingentLegEngine
//! ├── SimulationConfig      (path count, seed)
//! ├── TimeGrid              (settle → maturity, fixed step)
//! ├── Payoff grid           (inner quadrature loop, sequential)
//! │     grid[interval][scenario] ← DynamicPricer + collateral table
//! ├── FactorPathGenerator   (systemic factor trajectories + weights)
//! └── reduce_weighted_paths (Rayon map/reduce, commutative combine)
//! ```
//!
//! The payoff grid is built once per valuation under the inner one-factor
//! quadrature; the outer simulation then resolves each path step against
//! the grid by interpolating across the quadrature abscissae at the
//! path's realised factor value.

pub mod config;
pub mod engine;
pub mod error;
pub mod factor;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use engine::{reduce_weighted_paths, ContingentLegEngine};
pub use error::{ConfigError, EngineError};
pub use factor::{FactorPath, FactorPathGenerator};
