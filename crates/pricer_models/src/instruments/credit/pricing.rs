//! Payment-stream and credit-leg present values.
//!
//! The valuation helper shared by the note fee leg, the collateral bond,
//! and the dynamic pricers' `pv` queries. Everything here takes the
//! survival function as a closure so the same arithmetic serves both
//! unconditional curves and conditional (scenario) columns.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::market_data::error::MarketDataError;
use pricer_core::types::time::Date;

use crate::schedules::Schedule;

/// Survival mass below this is treated as certain default.
const SURVIVAL_FLOOR: f64 = 1e-12;

/// A dated cashflow stream in year-fraction time.
///
/// Amounts are per unit notional; times are year fractions from the
/// valuation anchor. Used for the note fee/principal leg and for
/// collateral bond valuation inside the contingent-leg engine.
#[derive(Debug, Clone)]
pub struct PaymentStream {
    payments: Vec<(f64, f64)>,
}

impl PaymentStream {
    /// Wraps `(time, amount)` pairs, sorting them by time.
    pub fn new(mut payments: Vec<(f64, f64)>) -> Self {
        payments.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { payments }
    }

    /// Builds the stream of a unit-notional bond over a schedule:
    /// `annual_rate × Δt` at each period end plus `redemption` at the
    /// final date. Times are measured from `as_of` under each period's
    /// day count.
    pub fn from_schedule(schedule: &Schedule, as_of: Date, annual_rate: f64, redemption: f64) -> Self {
        let mut payments: Vec<(f64, f64)> = schedule
            .iter()
            .map(|p| {
                let t = p.day_count().year_fraction(as_of, p.payment());
                (t, annual_rate * p.year_fraction())
            })
            .collect();
        if let Some(last) = payments.last_mut() {
            last.1 += redemption;
        }
        Self::new(payments)
    }

    /// The `(time, amount)` pairs, sorted by time.
    #[inline]
    pub fn payments(&self) -> &[(f64, f64)] {
        &self.payments
    }

    /// Number of cashflows.
    #[inline]
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    /// True when the stream has no cashflows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Present value at time `from` of the cashflows falling after it,
    /// conditional on survival to `from`.
    ///
    /// Each payment at `t` contributes
    /// `D(from, t) × S(t)/S(from) × amount`; payments at exactly `from`
    /// are included only when `include_start` is set. Returns 0 when the
    /// survival mass at `from` has already vanished.
    pub fn present_value<D, S>(
        &self,
        from: f64,
        discount: &D,
        survival: S,
        include_start: bool,
    ) -> Result<f64, MarketDataError>
    where
        D: YieldCurve<f64>,
        S: Fn(f64) -> f64,
    {
        let s_from = survival(from);
        if s_from <= SURVIVAL_FLOOR {
            return Ok(0.0);
        }

        let mut pv = 0.0;
        for &(t, amount) in &self.payments {
            let due = t > from || (include_start && t == from);
            if !due {
                continue;
            }
            let df = discount.forward_discount_factor(from, t)?;
            let s = (survival(t) / s_from).min(1.0).max(0.0);
            pv += df * s * amount;
        }
        Ok(pv)
    }
}

/// Present value at `from` of a protection leg paying `lgd` on default,
/// discretised over the grid `times`, conditional on survival to `from`.
///
/// ```text
/// PV = lgd × Σ D(from, tᵢ) × (S(tᵢ₋₁) − S(tᵢ)) / S(from)
/// ```
///
/// Grid points at or before `from` are skipped; duplicated grid points
/// contribute nothing.
pub fn protection_leg_pv<D, S>(
    times: &[f64],
    from: f64,
    lgd: f64,
    discount: &D,
    survival: S,
) -> Result<f64, MarketDataError>
where
    D: YieldCurve<f64>,
    S: Fn(f64) -> f64,
{
    let s_anchor = survival(from);
    if s_anchor <= SURVIVAL_FLOOR {
        return Ok(0.0);
    }

    let mut pv = 0.0;
    let mut s_prev = s_anchor;
    for &t in times {
        if t <= from {
            continue;
        }
        let s_t = survival(t);
        let dp = ((s_prev - s_t) / s_anchor).max(0.0);
        if dp > 0.0 {
            let df = discount.forward_discount_factor(from, t)?;
            pv += df * dp * lgd;
        }
        s_prev = s_t;
    }
    Ok(pv)
}

/// Present value at `from` of a premium leg paying `spread × Δt` on each
/// grid interval end, weighted by survival, conditional on survival to
/// `from`.
///
/// ```text
/// PV = spread × Σ D(from, tᵢ) × S(tᵢ)/S(from) × (tᵢ − tᵢ₋₁)
/// ```
pub fn premium_leg_pv<D, S>(
    times: &[f64],
    from: f64,
    spread: f64,
    discount: &D,
    survival: S,
) -> Result<f64, MarketDataError>
where
    D: YieldCurve<f64>,
    S: Fn(f64) -> f64,
{
    let s_anchor = survival(from);
    if s_anchor <= SURVIVAL_FLOOR {
        return Ok(0.0);
    }

    let mut pv = 0.0;
    let mut t_prev = from;
    for &t in times {
        if t <= from {
            continue;
        }
        let dt = t - t_prev;
        if dt > 0.0 {
            let df = discount.forward_discount_factor(from, t)?;
            let s = (survival(t) / s_anchor).min(1.0).max(0.0);
            pv += df * s * spread * dt;
        }
        t_prev = t;
    }
    Ok(pv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::{Frequency, ScheduleBuilder};
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::FlatCurve;

    fn grid(n: usize, dt: f64) -> Vec<f64> {
        (0..=n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn stream_pv_risk_free_zero_rate_sums_amounts() {
        let stream = PaymentStream::new(vec![(0.5, 1.0), (1.0, 2.0)]);
        let discount = FlatCurve::new(0.0_f64);
        let pv = stream.present_value(0.0, &discount, |_| 1.0, false).unwrap();
        assert_relative_eq!(pv, 3.0, max_relative = 1e-12);
    }

    #[test]
    fn stream_pv_skips_past_payments() {
        let stream = PaymentStream::new(vec![(0.25, 1.0), (0.75, 1.0)]);
        let discount = FlatCurve::new(0.0_f64);
        let pv = stream.present_value(0.5, &discount, |_| 1.0, false).unwrap();
        assert_relative_eq!(pv, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn stream_pv_include_start_flag() {
        let stream = PaymentStream::new(vec![(0.5, 1.0)]);
        let discount = FlatCurve::new(0.0_f64);
        let without = stream.present_value(0.5, &discount, |_| 1.0, false).unwrap();
        let with = stream.present_value(0.5, &discount, |_| 1.0, true).unwrap();
        assert_relative_eq!(without, 0.0);
        assert_relative_eq!(with, 1.0);
    }

    #[test]
    fn stream_pv_zero_survival_mass_is_zero() {
        let stream = PaymentStream::new(vec![(1.0, 1.0)]);
        let discount = FlatCurve::new(0.02_f64);
        let pv = stream.present_value(0.0, &discount, |_| 0.0, false).unwrap();
        assert_relative_eq!(pv, 0.0);
    }

    #[test]
    fn from_schedule_appends_redemption() {
        let schedule = ScheduleBuilder::new()
            .start(pricer_core::types::time::Date::from_ymd(2026, 1, 1).unwrap())
            .end(pricer_core::types::time::Date::from_ymd(2027, 1, 1).unwrap())
            .frequency(Frequency::SemiAnnual)
            .build()
            .unwrap();
        let as_of = pricer_core::types::time::Date::from_ymd(2026, 1, 1).unwrap();
        let stream = PaymentStream::from_schedule(&schedule, as_of, 0.04, 1.0);
        assert_eq!(stream.len(), 2);
        // Final payment carries coupon plus unit redemption.
        let (_, final_amount) = stream.payments()[1];
        assert!(final_amount > 1.0 && final_amount < 1.03);
    }

    #[test]
    fn protection_leg_matches_flat_closed_form() {
        // Flat hazard λ, flat rate r: each interval contributes
        // D(tᵢ)·(S(tᵢ₋₁)−S(tᵢ))·lgd with S = exp(-λt).
        let times = grid(20, 0.25);
        let discount = FlatCurve::new(0.02_f64);
        let hazard = 0.01;
        let survival = |t: f64| (-hazard * t).exp();

        let pv = protection_leg_pv(&times, 0.0, 0.6, &discount, survival).unwrap();

        let mut expected = 0.0;
        for k in 1..times.len() {
            let df = (-0.02 * times[k]).exp();
            let dp = survival(times[k - 1]) - survival(times[k]);
            expected += df * dp * 0.6;
        }
        assert_relative_eq!(pv, expected, max_relative = 1e-12);
    }

    #[test]
    fn premium_leg_flat_survival_is_annuity() {
        let times = grid(4, 0.25);
        let discount = FlatCurve::new(0.0_f64);
        let pv = premium_leg_pv(&times, 0.0, 0.01, &discount, |_| 1.0).unwrap();
        assert_relative_eq!(pv, 0.01, max_relative = 1e-12);
    }

    #[test]
    fn windowed_legs_condition_on_survival_to_from() {
        let times = grid(8, 0.25);
        let discount = FlatCurve::new(0.0_f64);
        let hazard = 0.05;
        let survival = |t: f64| (-hazard * t).exp();

        // Conditional on surviving to t=1, the remaining protection PV over
        // one year equals 1 − exp(-λ) at zero rates.
        let pv = protection_leg_pv(&times[..], 1.0, 1.0, &discount, survival).unwrap();
        assert_relative_eq!(pv, 1.0 - (-0.05_f64).exp(), max_relative = 1e-10);
    }

    #[test]
    fn legs_tolerate_duplicate_grid_points() {
        let mut times = grid(4, 0.25);
        times.push(1.0); // duplicated maturity
        let discount = FlatCurve::new(0.02_f64);
        let survival = |t: f64| (-0.01 * t).exp();

        let clean = protection_leg_pv(&grid(4, 0.25), 0.0, 0.6, &discount, survival).unwrap();
        let dup = protection_leg_pv(&times, 0.0, 0.6, &discount, survival).unwrap();
        assert_relative_eq!(clean, dup, max_relative = 1e-12);
    }
}
