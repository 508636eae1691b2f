//! Note-level pricing: fee leg plus contingent leg.

use pricer_core::market_data::curves::{VolatilityCurve, YieldCurve};
use pricer_core::types::time::{Date, DayCountConvention};
use pricer_models::dynamic::DynamicPricer;
use pricer_models::instruments::credit::CreditLinkedNote;

use crate::mc::{ContingentLegEngine, EngineError};

/// Decomposed present value of a credit-linked note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotePriceResult {
    /// Survival-contingent coupons and principal.
    pub fee_leg_pv: f64,
    /// Embedded protection cost from the contingent-leg engine.
    pub contingent_leg_pv: f64,
    /// Package value: `fee_leg_pv - contingent_leg_pv`.
    pub pv: f64,
}

/// Prices a credit-linked note by combining the survival-contingent fee
/// leg with the engine's contingent leg.
///
/// The fee leg integrates the pricer's conditional exhaustion law over
/// its own quadrature: each coupon (and the principal at maturity) is
/// weighted by the probability that the linked derivative has not
/// exhausted by the payment date.
pub struct NotePricer<'a, D: YieldCurve<f64>, V: VolatilityCurve<f64>> {
    engine: ContingentLegEngine<'a, D, V>,
    valuation: Date,
    day_count: DayCountConvention,
    discount: &'a D,
}

impl<'a, D: YieldCurve<f64>, V: VolatilityCurve<f64>> NotePricer<'a, D, V> {
    /// Creates a note pricer around a configured engine.
    ///
    /// `valuation` and `discount` must match the engine's anchoring.
    pub fn new(engine: ContingentLegEngine<'a, D, V>, valuation: Date, discount: &'a D) -> Self {
        Self {
            engine,
            valuation,
            day_count: DayCountConvention::Actual365Fixed,
            discount,
        }
    }

    /// Overrides the day count for coupon date mapping.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Prices the note.
    ///
    /// # Errors
    ///
    /// Engine and pricer failures propagate unchanged; no partial result
    /// is returned.
    pub fn price<P: DynamicPricer>(
        &self,
        note: &CreditLinkedNote<f64>,
        pricer: &mut P,
    ) -> Result<NotePriceResult, EngineError> {
        let contingent = self.engine.contingent_leg_pv(pricer)?;

        let weights = pricer.quadrature().weights().to_vec();
        let schedule = note.coupon_schedule();
        let t_maturity = self
            .day_count
            .year_fraction(self.valuation, schedule.end_date());

        let mut fee = 0.0;
        for (q, &weight) in weights.iter().enumerate() {
            pricer.evolve(q)?;

            let mut leg = 0.0;
            for period in schedule.iter() {
                let t = self.day_count.year_fraction(self.valuation, period.payment());
                if t <= 0.0 {
                    continue;
                }
                let alive = (1.0 - pricer.exhaustion_indicator(0.0, t)?).max(0.0);
                let df = self
                    .discount
                    .discount_factor(t)
                    .map_err(EngineError::from)?;
                leg += df * alive * note.coupon() * period.year_fraction();
            }

            if t_maturity > 0.0 {
                let alive = (1.0 - pricer.exhaustion_indicator(0.0, t_maturity)?).max(0.0);
                let df = self
                    .discount
                    .discount_factor(t_maturity)
                    .map_err(EngineError::from)?;
                leg += df * alive;
            }

            fee += weight * leg;
        }

        let fee_leg_pv = note.notional() * fee;
        let contingent_leg_pv = note.notional() * contingent;
        Ok(NotePriceResult {
            fee_leg_pv,
            contingent_leg_pv,
            pv: fee_leg_pv - contingent_leg_pv,
        })
    }
}
