//! Dynamic payoff generators.
//!
//! A [`DynamicPricer`] is the payoff side of one credit-derivative family
//! inside the contingent-leg engine: it can be conditioned on a quadrature
//! column of the systemic factor (`evolve`), and then answers the four
//! scenario queries the engine's payoff grid is built from. Four variants
//! implement the contract; they differ only in how loss, survival, and
//! value are read off their underlying curve or basket model.
//!
//! Conditioning is an index swap over precomputed tables, so `evolve` is
//! cheap and queries before the first `evolve` fail fast with
//! [`PricingError::InvalidState`].

mod basket_cds;
mod nth_to_default;
mod single_name;
mod tranche;

pub use basket_cds::BasketCdsDynamicPricer;
pub use nth_to_default::NthToDefaultDynamicPricer;
pub use single_name::SingleNameDynamicPricer;
pub use tranche::TrancheDynamicPricer;

use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

/// Denominator floor for conditional loss-given-default ratios.
///
/// When the conditional trigger-probability increment over an interval is
/// below this, the interval's contingent payment is taken as zero instead
/// of dividing two vanishing differences.
pub const RATIO_EPS: f64 = 1e-12;

/// Scenario-conditioned payoff generator for one credit derivative.
pub trait DynamicPricer {
    /// Conditions the underlying model on quadrature column `q`.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidState`] when `q` is out of range for the
    /// pricer's quadrature.
    fn evolve(&mut self, q: usize) -> Result<(), PricingError>;

    /// Present value per unit notional of the remaining protection and fee
    /// legs at time `t`, under the currently conditioned scenario.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidState`] before the first [`Self::evolve`].
    fn pv(&self, t: f64) -> Result<f64, PricingError>;

    /// Expected loss paid on exhaustion within `[t0, t1)`, conditional on
    /// exhaustion occurring in that interval.
    fn contingent_payment(&self, t0: f64, t1: f64) -> Result<f64, PricingError>;

    /// Conditional probability mass of exhaustion within `[t0, t1)`.
    fn exhaustion_indicator(&self, t0: f64, t1: f64) -> Result<f64, PricingError>;

    /// The quadrature rule the pricer conditions on.
    fn quadrature(&self) -> &NormalQuadrature;
}

/// Shared fail-fast unwrap of the evolved scenario index.
pub(crate) fn require_scenario(scenario: Option<usize>) -> Result<usize, PricingError> {
    scenario.ok_or_else(|| {
        PricingError::InvalidState("dynamic pricer queried before evolve".to_string())
    })
}

/// Shared validation of a scenario index against the quadrature size.
pub(crate) fn validate_scenario(q: usize, n_points: usize) -> Result<(), PricingError> {
    if q >= n_points {
        return Err(PricingError::InvalidState(format!(
            "scenario index {} out of range for {} quadrature points",
            q, n_points
        )));
    }
    Ok(())
}

/// Linear interpolation of cached scenario state on the pricer's grid.
///
/// Flat beyond the grid ends; a duplicated grid point (the appended
/// maturity) falls back to the left value.
pub(crate) fn interp_on_grid(times: &[f64], values: &[f64], t: f64) -> f64 {
    let n = times.len();
    if n == 0 {
        return 0.0;
    }
    if t <= times[0] {
        return values[0];
    }
    if t >= times[n - 1] {
        return values[n - 1];
    }
    let pos = times.partition_point(|&x| x <= t);
    let i = pos.saturating_sub(1).min(n - 2);
    let dt = times[i + 1] - times[i];
    if dt <= 0.0 {
        return values[i];
    }
    values[i] + (values[i + 1] - values[i]) * (t - times[i]) / dt
}
