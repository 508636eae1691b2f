//! Single-name CDS dynamic pricer.

use pricer_core::market_data::curves::{CreditCurve, YieldCurve};
use pricer_core::market_data::error::MarketDataError;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use super::{require_scenario, validate_scenario, DynamicPricer};
use crate::copula::{ConditionalSurvivalTable, OneFactorCopula};
use crate::instruments::credit::{premium_leg_pv, protection_leg_pv, CreditDefaultSwap};

/// Dynamic pricer for a note linked to one reference entity.
///
/// Conditioning runs over a single conditional survival table; exhaustion
/// is simply default of the name, and the contingent payment is the fixed
/// loss given default `1 − recovery`.
#[derive(Debug, Clone)]
pub struct SingleNameDynamicPricer<'a, D: YieldCurve<f64>> {
    table: ConditionalSurvivalTable,
    times: Vec<f64>,
    discount: &'a D,
    recovery: f64,
    spread: f64,
    scenario: Option<usize>,
}

impl<'a, D: YieldCurve<f64>> SingleNameDynamicPricer<'a, D> {
    /// Builds the pricer, precomputing the conditional table on `times`.
    ///
    /// # Arguments
    ///
    /// * `curve` - marginal survival curve of the reference entity
    /// * `copula` - one-factor copula (loading + quadrature)
    /// * `times` - valuation grid in year fractions
    /// * `discount` - discount curve for the leg values
    /// * `recovery` - reference recovery rate in `[0, 1]`
    /// * `spread` - annual premium of the linked CDS
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidRecovery`] for a recovery outside `[0, 1]`,
    /// plus curve/copula construction errors.
    pub fn new<C: CreditCurve<f64>>(
        curve: &C,
        copula: &OneFactorCopula,
        times: &[f64],
        discount: &'a D,
        recovery: f64,
        spread: f64,
    ) -> Result<Self, MarketDataError> {
        if !(0.0..=1.0).contains(&recovery) || recovery.is_nan() {
            return Err(MarketDataError::InvalidRecovery { recovery });
        }
        let table = copula.condition_curve(times, curve)?;
        Ok(Self {
            table,
            times: times.to_vec(),
            discount,
            recovery,
            spread,
            scenario: None,
        })
    }

    /// Builds the pricer from a CDS definition, reading recovery and
    /// spread from the instrument.
    pub fn from_cds<C: CreditCurve<f64>>(
        cds: &CreditDefaultSwap<f64>,
        curve: &C,
        copula: &OneFactorCopula,
        times: &[f64],
        discount: &'a D,
    ) -> Result<Self, MarketDataError> {
        Self::new(
            curve,
            copula,
            times,
            discount,
            cds.recovery_rate(),
            cds.spread(),
        )
    }

    /// Loss given default of the reference entity.
    #[inline]
    pub fn loss_given_default(&self) -> f64 {
        1.0 - self.recovery
    }
}

impl<D: YieldCurve<f64>> DynamicPricer for SingleNameDynamicPricer<'_, D> {
    fn evolve(&mut self, q: usize) -> Result<(), PricingError> {
        validate_scenario(q, self.table.n_points())?;
        self.scenario = Some(q);
        Ok(())
    }

    fn pv(&self, t: f64) -> Result<f64, PricingError> {
        let q = require_scenario(self.scenario)?;
        let view = self.table.conditional_curve(q)?;
        let survival = |u: f64| view.survival(u);

        let protection = protection_leg_pv(
            &self.times,
            t,
            self.loss_given_default(),
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
        Ok(self.loss_given_default())
    }

    fn exhaustion_indicator(&self, t0: f64, t1: f64) -> Result<f64, PricingError> {
        let q = require_scenario(self.scenario)?;
        let view = self.table.conditional_curve(q)?;
        Ok((view.exhaustion_probability(t1) - view.exhaustion_probability(t0)).max(0.0))
    }

    fn quadrature(&self) -> &NormalQuadrature {
        self.table.quadrature()
    }
}
