//! Nth-to-default dynamic pricer.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use super::{interp_on_grid, require_scenario, validate_scenario, DynamicPricer, RATIO_EPS};
use crate::basket::BasketLossModel;
use crate::instruments::credit::premium_leg_pv;

/// Dynamic pricer for a note linked to the `n`-th ordered default.
///
/// Exhaustion is the arrival of the `n`-th default. The contingent
/// payment over an interval is the ratio of the conditional expected-loss
/// increment to the conditional trigger-probability increment, two small
/// differences, floored by [`RATIO_EPS`] so a vanishing denominator
/// yields a zero payment instead of a spurious quotient.
#[derive(Debug, Clone)]
pub struct NthToDefaultDynamicPricer<'a, M: BasketLossModel, D: YieldCurve<f64>> {
    model: M,
    order: usize,
    times: Vec<f64>,
    discount: &'a D,
    spread: f64,
    scenario: Option<usize>,
    // Scenario caches on `times`, refreshed by evolve.
    event_survival: Vec<f64>,
    expected_loss: Vec<f64>,
}

impl<'a, M: BasketLossModel, D: YieldCurve<f64>> NthToDefaultDynamicPricer<'a, M, D> {
    /// Builds the pricer for the `order`-th default (1-based).
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] when `order` is zero or exceeds the
    /// pool size.
    pub fn new(
        model: M,
        order: usize,
        times: &[f64],
        discount: &'a D,
        spread: f64,
    ) -> Result<Self, PricingError> {
        if order == 0 || order > model.names() {
            return Err(PricingError::InvalidInput(format!(
                "nth-to-default order {} invalid for a pool of {} names",
                order,
                model.names()
            )));
        }
        Ok(Self {
            model,
            order,
            times: times.to_vec(),
            discount,
            spread,
            scenario: None,
            event_survival: Vec::new(),
            expected_loss: Vec::new(),
        })
    }

    /// The protected default order (1-based).
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }
}

impl<M: BasketLossModel, D: YieldCurve<f64>> DynamicPricer for NthToDefaultDynamicPricer<'_, M, D> {
    fn evolve(&mut self, q: usize) -> Result<(), PricingError> {
        validate_scenario(q, self.model.quadrature().len())?;
        self.event_survival = self
            .times
            .iter()
            .map(|&t| self.model.prob_at_least(q, t, self.order).map(|p| 1.0 - p))
            .collect::<Result<_, _>>()?;
        self.expected_loss = self
            .times
            .iter()
            .map(|&t| self.model.expected_nth_loss(q, t, self.order))
            .collect::<Result<_, _>>()?;
        self.scenario = Some(q);
        Ok(())
    }

    fn pv(&self, t: f64) -> Result<f64, PricingError> {
        let q = require_scenario(self.scenario)?;
        let survival = |u: f64| interp_on_grid(&self.times, &self.event_survival, u);

        let s_anchor = survival(t);
        if s_anchor <= RATIO_EPS {
            return Ok(0.0);
        }

        // Protection leg from conditional expected-loss increments.
        let mut protection = 0.0;
        let mut el_prev = interp_on_grid(&self.times, &self.expected_loss, t);
        for &u in &self.times {
            if u <= t {
                continue;
            }
            let el = interp_on_grid(&self.times, &self.expected_loss, u);
            let d_el = (el - el_prev).max(0.0);
            if d_el > 0.0 {
                let df = self
                    .discount
                    .forward_discount_factor(t, u)
                    .map_err(PricingError::from)?;
                protection += df * d_el / s_anchor;
            }
            el_prev = el;
        }

        let premium = premium_leg_pv(&self.times, t, self.spread, self.discount, survival)
            .map_err(PricingError::from)?;

        let settlement = self.model.default_settlement_pv(q, t)?;
        Ok(protection - premium + settlement)
    }

    fn contingent_payment(&self, t0: f64, t1: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        let s0 = interp_on_grid(&self.times, &self.event_survival, t0);
        let s1 = interp_on_grid(&self.times, &self.event_survival, t1);
        let d_trigger = s0 - s1;
        if d_trigger < RATIO_EPS {
            // Degenerate interval: no measurable trigger mass, no payment.
            return Ok(0.0);
        }
        let el0 = interp_on_grid(&self.times, &self.expected_loss, t0);
        let el1 = interp_on_grid(&self.times, &self.expected_loss, t1);
        Ok(((el1 - el0) / d_trigger).max(0.0))
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
