//! Basket loss models.
//!
//! [`BasketLossModel`] is the conditional-query surface the dynamic
//! pricers read: everything a tranche, nth-to-default, or basket CDS
//! payoff needs, conditioned on a quadrature column of the shared
//! systemic factor. [`HomogeneousPool`] is the workhorse implementation:
//! identical names, one marginal curve, one loading, conditional default
//! counts Binomial by conditional independence.

mod pool;

pub use pool::HomogeneousPool;

use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

/// Conditional loss queries over a credit basket.
///
/// All probabilities and losses are conditional on the systemic factor
/// taking the value of quadrature column `q`; loss quantities are
/// fractions of pool notional unless stated otherwise. Implementations
/// precompute whatever tables they need so queries are cheap inside the
/// engine's loops.
pub trait BasketLossModel {
    /// Number of names in the pool.
    fn names(&self) -> usize;

    /// The quadrature rule the model is conditioned on.
    fn quadrature(&self) -> &NormalQuadrature;

    /// Per-name loss given default (fraction of name notional).
    fn loss_given_default(&self) -> f64;

    /// Conditional per-name default probability by `t` given column `q`.
    fn conditional_default_probability(&self, q: usize, t: f64) -> Result<f64, PricingError>;

    /// Conditional probability of at least `n` defaults by `t`.
    fn prob_at_least(&self, q: usize, t: f64, n: usize) -> Result<f64, PricingError>;

    /// Conditional expected pool loss by `t` (fraction of pool notional).
    fn expected_pool_loss(&self, q: usize, t: f64) -> Result<f64, PricingError>;

    /// Conditional expected tranche loss by `t`, as a fraction of tranche
    /// notional. `attach`/`detach` are pool-loss fractions with
    /// `0 <= attach < detach <= 1`.
    fn expected_tranche_loss(
        &self,
        q: usize,
        t: f64,
        attach: f64,
        detach: f64,
    ) -> Result<f64, PricingError>;

    /// Conditional expected cumulative loss paid by the `n`-th-default
    /// protection by `t` (per unit name notional).
    fn expected_nth_loss(&self, q: usize, t: f64, n: usize) -> Result<f64, PricingError>;

    /// Present value of defaults awaiting settlement at `t`.
    ///
    /// Zero unless the model tracks realised-but-unsettled losses.
    fn default_settlement_pv(&self, _q: usize, _t: f64) -> Result<f64, PricingError> {
        Ok(0.0)
    }
}
