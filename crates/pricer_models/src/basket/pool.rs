//! Homogeneous-pool basket loss model.

use pricer_core::market_data::curves::CreditCurve;
use pricer_core::market_data::error::MarketDataError;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use super::BasketLossModel;
use crate::copula::{ConditionalSurvivalTable, OneFactorCopula};

/// Conditional default probabilities closer to the boundary than this are
/// treated as exactly 0 or 1 when building the binomial distribution.
const PROB_EPS: f64 = 1e-12;

/// Homogeneous pool of `m` names under a one-factor Gaussian copula.
///
/// Every name shares one marginal survival curve, one recovery rate, and
/// one factor loading, so conditional on the systemic factor the default
/// count by any horizon is `Binomial(m, p(q, t))`. That closes every
/// [`BasketLossModel`] query in a handful of binomial sums.
///
/// # Example
///
/// ```
/// use pricer_models::basket::{BasketLossModel, HomogeneousPool};
/// use pricer_models::copula::OneFactorCopula;
/// use pricer_core::market_data::curves::FlatHazardCurve;
///
/// let copula = OneFactorCopula::new(0.5, 15).unwrap();
/// let curve = FlatHazardCurve::new(0.02_f64);
/// let times: Vec<f64> = (0..=20).map(|i| i as f64 * 0.25).collect();
/// let pool = HomogeneousPool::new(10, 0.4, &copula, &times, &curve).unwrap();
///
/// // At least zero defaults is a certainty.
/// assert_eq!(pool.prob_at_least(0, 5.0, 0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct HomogeneousPool {
    names: usize,
    recovery: f64,
    table: ConditionalSurvivalTable,
}

impl HomogeneousPool {
    /// Builds the pool and its conditional survival table.
    ///
    /// # Errors
    ///
    /// - [`MarketDataError::InsufficientData`] for an empty pool
    /// - [`MarketDataError::InvalidRecovery`] for recovery outside `[0, 1]`
    /// - curve/copula errors from table construction
    pub fn new<C: CreditCurve<f64>>(
        names: usize,
        recovery: f64,
        copula: &OneFactorCopula,
        times: &[f64],
        curve: &C,
    ) -> Result<Self, MarketDataError> {
        if names == 0 {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        if !(0.0..=1.0).contains(&recovery) || recovery.is_nan() {
            return Err(MarketDataError::InvalidRecovery { recovery });
        }
        let table = copula.condition_curve(times, curve)?;
        Ok(Self {
            names,
            recovery,
            table,
        })
    }

    /// The underlying conditional survival table.
    #[inline]
    pub fn table(&self) -> &ConditionalSurvivalTable {
        &self.table
    }

    /// Per-name recovery rate.
    #[inline]
    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    /// Binomial pmf over the default count for success probability `p`.
    fn default_count_pmf(&self, p: f64) -> Vec<f64> {
        let m = self.names;
        let mut pmf = vec![0.0; m + 1];
        if p <= PROB_EPS {
            pmf[0] = 1.0;
            return pmf;
        }
        if p >= 1.0 - PROB_EPS {
            pmf[m] = 1.0;
            return pmf;
        }
        // Iterative ratio recursion keeps the terms stable for the pool
        // sizes this model targets.
        let ratio = p / (1.0 - p);
        pmf[0] = (1.0 - p).powi(m as i32);
        for k in 1..=m {
            pmf[k] = pmf[k - 1] * ratio * (m - k + 1) as f64 / k as f64;
        }
        pmf
    }

    fn conditional_p(&self, q: usize, t: f64) -> Result<f64, PricingError> {
        if t < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "negative horizon {} in basket query",
                t
            )));
        }
        let view = self.table.conditional_curve(q)?;
        Ok((1.0 - view.survival(t)).clamp(0.0, 1.0))
    }
}

impl BasketLossModel for HomogeneousPool {
    fn names(&self) -> usize {
        self.names
    }

    fn quadrature(&self) -> &NormalQuadrature {
        self.table.quadrature()
    }

    fn loss_given_default(&self) -> f64 {
        1.0 - self.recovery
    }

    fn conditional_default_probability(&self, q: usize, t: f64) -> Result<f64, PricingError> {
        self.conditional_p(q, t)
    }

    fn prob_at_least(&self, q: usize, t: f64, n: usize) -> Result<f64, PricingError> {
        if n == 0 {
            return Ok(1.0);
        }
        if n > self.names {
            return Ok(0.0);
        }
        let p = self.conditional_p(q, t)?;
        let pmf = self.default_count_pmf(p);
        Ok(pmf[n..].iter().sum::<f64>().clamp(0.0, 1.0))
    }

    fn expected_pool_loss(&self, q: usize, t: f64) -> Result<f64, PricingError> {
        let p = self.conditional_p(q, t)?;
        Ok(p * self.loss_given_default())
    }

    fn expected_tranche_loss(
        &self,
        q: usize,
        t: f64,
        attach: f64,
        detach: f64,
    ) -> Result<f64, PricingError> {
        if !(0.0..1.0).contains(&attach) || detach <= attach || detach > 1.0 {
            return Err(PricingError::InvalidInput(format!(
                "invalid tranche bounds [{}, {}]",
                attach, detach
            )));
        }
        let p = self.conditional_p(q, t)?;
        let pmf = self.default_count_pmf(p);
        let lgd = self.loss_given_default();
        let m = self.names as f64;

        let mut expected = 0.0;
        for (k, &mass) in pmf.iter().enumerate() {
            let pool_loss = lgd * k as f64 / m;
            let tranche_loss = (pool_loss - attach).max(0.0).min(detach - attach);
            expected += mass * tranche_loss;
        }
        Ok((expected / (detach - attach)).clamp(0.0, 1.0))
    }

    fn expected_nth_loss(&self, q: usize, t: f64, n: usize) -> Result<f64, PricingError> {
        let trigger = self.prob_at_least(q, t, n)?;
        Ok(self.loss_given_default() * trigger)
    }
}
