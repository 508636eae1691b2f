//! CDO tranche dynamic pricer.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use super::{interp_on_grid, require_scenario, validate_scenario, DynamicPricer, RATIO_EPS};
use crate::basket::BasketLossModel;

/// Dynamic pricer for a note linked to a CDO tranche.
///
/// Exhaustion means the pool loss has eaten through the detachment point
/// and the tranche notional is wiped out, so the contingent payment is
/// the full unit of tranche notional. `evolve` caches the conditional
/// expected tranche loss and the conditional wipe-out probability for the
/// selected scenario.
#[derive(Debug, Clone)]
pub struct TrancheDynamicPricer<'a, M: BasketLossModel, D: YieldCurve<f64>> {
    model: M,
    attach: f64,
    detach: f64,
    times: Vec<f64>,
    discount: &'a D,
    spread: f64,
    scenario: Option<usize>,
    // Scenario caches on `times`, refreshed by evolve.
    tranche_loss: Vec<f64>,
    wipeout_prob: Vec<f64>,
}

impl<'a, M: BasketLossModel, D: YieldCurve<f64>> TrancheDynamicPricer<'a, M, D> {
    /// Builds the pricer for the `[attach, detach]` tranche (pool-loss
    /// fractions).
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] for bounds outside
    /// `0 <= attach < detach <= 1`.
    pub fn new(
        model: M,
        attach: f64,
        detach: f64,
        times: &[f64],
        discount: &'a D,
        spread: f64,
    ) -> Result<Self, PricingError> {
        if !(0.0..1.0).contains(&attach) || detach <= attach || detach > 1.0 {
            return Err(PricingError::InvalidInput(format!(
                "invalid tranche bounds [{}, {}]",
                attach, detach
            )));
        }
        Ok(Self {
            model,
            attach,
            detach,
            times: times.to_vec(),
            discount,
            spread,
            scenario: None,
            tranche_loss: Vec::new(),
            wipeout_prob: Vec::new(),
        })
    }

    /// Attachment point (pool-loss fraction).
    #[inline]
    pub fn attach(&self) -> f64 {
        self.attach
    }

    /// Detachment point (pool-loss fraction).
    #[inline]
    pub fn detach(&self) -> f64 {
        self.detach
    }

    /// Smallest default count that wipes the tranche out.
    fn wipeout_count(&self) -> usize {
        let lgd = self.model.loss_given_default();
        if lgd <= 0.0 {
            // Zero severity: the tranche can never be wiped out.
            return self.model.names() + 1;
        }
        let m = self.model.names() as f64;
        (self.detach * m / lgd).ceil() as usize
    }
}

impl<M: BasketLossModel, D: YieldCurve<f64>> DynamicPricer for TrancheDynamicPricer<'_, M, D> {
    fn evolve(&mut self, q: usize) -> Result<(), PricingError> {
        validate_scenario(q, self.model.quadrature().len())?;
        let n_wipe = self.wipeout_count();
        self.tranche_loss = self
            .times
            .iter()
            .map(|&t| self.model.expected_tranche_loss(q, t, self.attach, self.detach))
            .collect::<Result<_, _>>()?;
        self.wipeout_prob = self
            .times
            .iter()
            .map(|&t| self.model.prob_at_least(q, t, n_wipe))
            .collect::<Result<_, _>>()?;
        self.scenario = Some(q);
        Ok(())
    }

    fn pv(&self, t: f64) -> Result<f64, PricingError> {
        let q = require_scenario(self.scenario)?;
        let remaining = |u: f64| 1.0 - interp_on_grid(&self.times, &self.tranche_loss, u);

        let anchor = remaining(t);
        if anchor <= RATIO_EPS {
            return Ok(0.0);
        }

        // Protection leg over expected tranche-loss increments, premium on
        // the surviving tranche fraction, both per unit of the tranche
        // notional outstanding at t.
        let mut protection = 0.0;
        let mut premium = 0.0;
        let mut loss_prev = interp_on_grid(&self.times, &self.tranche_loss, t);
        let mut t_prev = t;
        for &u in &self.times {
            if u <= t {
                continue;
            }
            let loss = interp_on_grid(&self.times, &self.tranche_loss, u);
            let df = self
                .discount
                .forward_discount_factor(t, u)
                .map_err(PricingError::from)?;
            let d_loss = (loss - loss_prev).max(0.0);
            protection += df * d_loss / anchor;
            premium += df * (1.0 - loss).max(0.0) / anchor * self.spread * (u - t_prev);
            loss_prev = loss;
            t_prev = u;
        }

        let settlement = self.model.default_settlement_pv(q, t)?;
        Ok(protection - premium + settlement)
    }

    fn contingent_payment(&self, _t0: f64, _t1: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        // Wipe-out forfeits the full tranche notional.
        Ok(1.0)
    }

    fn exhaustion_indicator(&self, t0: f64, t1: f64) -> Result<f64, PricingError> {
        require_scenario(self.scenario)?;
        let x0 = interp_on_grid(&self.times, &self.wipeout_prob, t0);
        let x1 = interp_on_grid(&self.times, &self.wipeout_prob, t1);
        Ok((x1 - x0).max(0.0))
    }

    fn quadrature(&self) -> &NormalQuadrature {
        self.model.quadrature()
    }
}
