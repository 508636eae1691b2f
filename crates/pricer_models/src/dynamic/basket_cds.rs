//! Basket CDS (first-to-default) dynamic pricer.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use super::{interp_on_grid, require_scenario, validate_scenario, DynamicPricer};
use crate::basket::BasketLossModel;
use crate::instruments::credit::{premium_leg_pv, protection_leg_pv};

/// Dynamic pricer for a note linked to the first default in a basket.
///
/// Exhaustion is the first default among the pool names; the contingent
/// payment is the pool's maximum single-name loss, a constant under the
/// homogeneous model. `evolve` caches the conditional first-to-default
/// survival curve for the selected scenario.
#[derive(Debug, Clone)]
pub struct BasketCdsDynamicPricer<'a, M: BasketLossModel, D: YieldCurve<f64>> {
    model: M,
    times: Vec<f64>,
    discount: &'a D,
    spread: f64,
    scenario: Option<usize>,
    // Conditional survival of the first-to-default event on `times`,
    // refreshed by evolve.
    event_survival: Vec<f64>,
}

impl<'a, M: BasketLossModel, D: YieldCurve<f64>> BasketCdsDynamicPricer<'a, M, D> {
    /// Builds the pricer over a basket model and valuation grid.
    pub fn new(model: M, times: &[f64], discount: &'a D, spread: f64) -> Self {
        Self {
            model,
            times: times.to_vec(),
            discount,
            spread,
            scenario: None,
            event_survival: Vec::new(),
        }
    }

    /// The wrapped basket model.
    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: BasketLossModel, D: YieldCurve<f64>> DynamicPricer for BasketCdsDynamicPricer<'_, M, D> {
    fn evolve(&mut self, q: usize) -> Result<(), PricingError> {
        validate_scenario(q, self.model.quadrature().len())?;
        self.event_survival = self
            .times
            .iter()
            .map(|&t| self.model.prob_at_least(q, t, 1).map(|p| 1.0 - p))
            .collect::<Result<_, _>>()?;
        self.scenario = Some(q);
        Ok(())
    }

    fn pv(&self, t: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        let survival = |u: f64| interp_on_grid(&self.times, &self.event_survival, u);

        let protection = protection_leg_pv(
            &self.times,
            t,
            self.model.loss_given_default(),
            self.discount,
            survival,
        )
        .map_err(PricingError::from)?;
        let premium = premium_leg_pv(&self.times, t, self.spread, self.discount, survival)
            .map_err(PricingError::from)?;
        Ok(protection - premium)
    }

    fn contingent_payment(&self, _t0: f64, _t1: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        Ok(self.model.loss_given_default())
    }

    fn exhaustion_indicator(&self, t0: f64, t1: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        let s0 = interp_on_grid(&self.times, &self.event_survival, t0);
        let s1 = interp_on_grid(&self.times, &self.event_survival, t1);
        Ok((s0 - s1).max(0.0))
    }

    fn quadrature(&self) -> &NormalQuadrature {
        self.model.quadrature()
    }
}
