//! Conditional survival tables under a one-factor Gaussian copula.

use pricer_core::market_data::curves::CreditCurve;
use pricer_core::market_data::error::MarketDataError;
use pricer_core::math::quadrature::NormalQuadrature;
use pricer_core::types::PricingError;

use crate::analytical::distributions::{norm_cdf, norm_inv};

/// Below this, `1 - β²` is treated as fully degenerate (`|β| = 1`).
const DEGENERATE_EPS: f64 = 1e-12;

/// Survival probabilities this close to the boundary short-circuit the
/// threshold transform (Φ⁻¹ is undefined at 0 and 1).
const PROB_EPS: f64 = 1e-15;

/// One-factor Gaussian copula.
///
/// Default of a name is driven by `X = β·Z + √(1−β²)·ε` with systemic
/// factor `Z` and idiosyncratic `ε`, both standard normal. Conditioning
/// on `Z = z` gives
///
/// ```text
/// P(τ > t | Z = z) = Φ( (Φ⁻¹(S(t)) + β·z) / √(1−β²) )
/// ```
///
/// which degenerates to the unconditional curve at `β = 0` and to an
/// indicator at `|β| = 1`.
#[derive(Debug, Clone)]
pub struct OneFactorCopula {
    loading: f64,
    quadrature: NormalQuadrature,
}

impl OneFactorCopula {
    /// Creates a copula with the given factor loading and quadrature order.
    ///
    /// # Errors
    ///
    /// - [`MarketDataError::InvalidCorrelation`] when `loading ∉ [-1, 1]`
    /// - quadrature construction errors for order 0
    pub fn new(loading: f64, order: usize) -> Result<Self, MarketDataError> {
        if !(-1.0..=1.0).contains(&loading) || loading.is_nan() {
            return Err(MarketDataError::InvalidCorrelation { rho: loading });
        }
        let quadrature = NormalQuadrature::new(order).map_err(|_| {
            MarketDataError::InsufficientData { got: order, need: 1 }
        })?;
        Ok(Self {
            loading,
            quadrature,
        })
    }

    /// Copula from an asset correlation `ρ ∈ [0, 1]` (loading `β = √ρ`).
    pub fn from_correlation(correlation: f64, order: usize) -> Result<Self, MarketDataError> {
        if !(0.0..=1.0).contains(&correlation) || correlation.is_nan() {
            return Err(MarketDataError::InvalidCorrelation { rho: correlation });
        }
        Self::new(correlation.sqrt(), order)
    }

    /// The factor loading β.
    #[inline]
    pub fn loading(&self) -> f64 {
        self.loading
    }

    /// The quadrature rule over the systemic factor.
    #[inline]
    pub fn quadrature(&self) -> &NormalQuadrature {
        &self.quadrature
    }

    /// Survival probability conditional on `Z = z`, given the
    /// unconditional survival `s`.
    pub fn conditional_survival(&self, s: f64, z: f64) -> f64 {
        if s >= 1.0 - PROB_EPS {
            return 1.0;
        }
        if s <= PROB_EPS {
            return 0.0;
        }
        let beta = self.loading;
        if beta == 0.0 {
            // Degenerate: the unconditional curve repeats across all z.
            return s;
        }
        let denom_sq = 1.0 - beta * beta;
        // norm_inv cannot fail here: s is strictly inside (0, 1).
        let threshold = norm_inv(s).unwrap_or(0.0);
        if denom_sq < DEGENERATE_EPS {
            // |β| = 1: default is decided by the factor alone.
            return if threshold + beta * z > 0.0 { 1.0 } else { 0.0 };
        }
        norm_cdf((threshold + beta * z) / denom_sq.sqrt()).clamp(0.0, 1.0)
    }

    /// Precomputes the conditional survival table of a marginal curve on a
    /// time grid. Performed once per instrument; all scenario queries read
    /// the result.
    ///
    /// # Errors
    ///
    /// Curve lookups surface as [`MarketDataError`]; the grid may contain
    /// duplicated times (the table simply repeats the row).
    pub fn condition_curve<C: CreditCurve<f64> + ?Sized>(
        &self,
        times: &[f64],
        curve: &C,
    ) -> Result<ConditionalSurvivalTable, MarketDataError> {
        let mut values = Vec::with_capacity(times.len());
        for &t in times {
            let s = curve.survival_probability(t)?;
            let row: Vec<f64> = self
                .quadrature
                .points()
                .iter()
                .map(|&z| self.conditional_survival(s, z))
                .collect();
            values.push(row);
        }
        Ok(ConditionalSurvivalTable {
            times: times.to_vec(),
            quadrature: self.quadrature.clone(),
            values,
        })
    }
}

/// Dense `[time][quadrature]` table of conditional survival probabilities.
///
/// Built once by [`OneFactorCopula::condition_curve`]; immutable
/// afterwards. Scenario conditioning is the read-only
/// [`ConditionalSurvivalTable::conditional_curve`] accessor, so tables can
/// be shared freely across the engine's inner loop.
#[derive(Debug, Clone)]
pub struct ConditionalSurvivalTable {
    times: Vec<f64>,
    quadrature: NormalQuadrature,
    values: Vec<Vec<f64>>,
}

impl ConditionalSurvivalTable {
    /// The time grid the table was built on.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The quadrature rule used for conditioning.
    #[inline]
    pub fn quadrature(&self) -> &NormalQuadrature {
        &self.quadrature
    }

    /// Number of quadrature columns.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.quadrature.len()
    }

    /// Table entry at `(time index, quadrature index)`.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidState`] when either index is out of range.
    pub fn survival(&self, time_idx: usize, q: usize) -> Result<f64, PricingError> {
        if time_idx >= self.times.len() || q >= self.n_points() {
            return Err(PricingError::InvalidState(format!(
                "conditional table queried at ({}, {}) but dimensions are ({}, {})",
                time_idx,
                q,
                self.times.len(),
                self.n_points()
            )));
        }
        Ok(self.values[time_idx][q])
    }

    /// Immutable curve view conditioned on quadrature column `q`.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidState`] when `q` is out of range.
    pub fn conditional_curve(&self, q: usize) -> Result<ConditionalCurve<'_>, PricingError> {
        if q >= self.n_points() {
            return Err(PricingError::InvalidState(format!(
                "scenario index {} out of range for {} quadrature points",
                q,
                self.n_points()
            )));
        }
        Ok(ConditionalCurve { table: self, q })
    }
}

/// Read-only survival curve conditioned on one quadrature column.
///
/// Interpolates linearly between the table's grid times and extrapolates
/// flat beyond them.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalCurve<'a> {
    table: &'a ConditionalSurvivalTable,
    q: usize,
}

impl ConditionalCurve<'_> {
    /// The scenario (quadrature) index this view is conditioned on.
    #[inline]
    pub fn scenario(&self) -> usize {
        self.q
    }

    /// Conditional survival probability at time `t`.
    pub fn survival(&self, t: f64) -> f64 {
        let times = &self.table.times;
        let n = times.len();
        if n == 0 {
            return 1.0;
        }
        if t <= times[0] {
            return self.table.values[0][self.q];
        }
        if t >= times[n - 1] {
            return self.table.values[n - 1][self.q];
        }
        let pos = times.partition_point(|&x| x <= t);
        let i = pos.saturating_sub(1).min(n - 2);
        let (t0, t1) = (times[i], times[i + 1]);
        let (y0, y1) = (self.table.values[i][self.q], self.table.values[i + 1][self.q]);
        let dt = t1 - t0;
        if dt <= 0.0 {
            return y0;
        }
        y0 + (y1 - y0) * (t - t0) / dt
    }

    /// Probability that the name has defaulted by `t`, `1 − S(t|z)`.
    #[inline]
    pub fn exhaustion_probability(&self, t: f64) -> f64 {
        1.0 - self.survival(t)
    }
}

impl CreditCurve<f64> for ConditionalCurve<'_> {
    fn survival_probability(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.survival(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::FlatHazardCurve;

    fn grid() -> Vec<f64> {
        (0..=20).map(|i| i as f64 * 0.25).collect()
    }

    #[test]
    fn rejects_loading_outside_unit_interval() {
        assert!(matches!(
            OneFactorCopula::new(1.5, 25),
            Err(MarketDataError::InvalidCorrelation { .. })
        ));
        assert!(matches!(
            OneFactorCopula::new(-1.01, 25),
            Err(MarketDataError::InvalidCorrelation { .. })
        ));
        assert!(OneFactorCopula::new(-1.0, 25).is_ok());
    }

    #[test]
    fn from_correlation_takes_square_root() {
        let copula = OneFactorCopula::from_correlation(0.25, 9).unwrap();
        assert_relative_eq!(copula.loading(), 0.5, max_relative = 1e-12);
        assert!(OneFactorCopula::from_correlation(-0.1, 9).is_err());
    }

    #[test]
    fn zero_loading_reproduces_marginal_in_every_column() {
        let copula = OneFactorCopula::new(0.0, 15).unwrap();
        let curve = FlatHazardCurve::new(0.02_f64);
        let table = copula.condition_curve(&grid(), &curve).unwrap();

        for (k, &t) in grid().iter().enumerate() {
            let s = curve.survival_probability(t).unwrap();
            for q in 0..table.n_points() {
                // A&S CDF round-trip limits the tolerance.
                assert_relative_eq!(table.survival(k, q).unwrap(), s, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn columns_are_non_increasing_in_time() {
        let copula = OneFactorCopula::new(0.6, 15).unwrap();
        let curve = FlatHazardCurve::new(0.03_f64);
        let table = copula.condition_curve(&grid(), &curve).unwrap();

        for q in 0..table.n_points() {
            let mut prev = 1.0;
            for k in 0..table.times().len() {
                let s = table.survival(k, q).unwrap();
                assert!(s <= prev + 1e-12);
                assert!((0.0..=1.0).contains(&s));
                prev = s;
            }
        }
    }

    #[test]
    fn weighted_row_average_reproduces_marginal() {
        let copula = OneFactorCopula::new(0.5, 25).unwrap();
        let curve = FlatHazardCurve::new(0.02_f64);
        let table = copula.condition_curve(&grid(), &curve).unwrap();
        let weights = table.quadrature().weights().to_vec();

        for (k, &t) in grid().iter().enumerate() {
            let s = curve.survival_probability(t).unwrap();
            let avg: f64 = (0..table.n_points())
                .map(|q| weights[q] * table.survival(k, q).unwrap())
                .sum();
            // Quadrature integrates the conditional law back to the marginal.
            assert_relative_eq!(avg, s, epsilon = 5e-5);
        }
    }

    #[test]
    fn dispersion_grows_with_loading() {
        let curve = FlatHazardCurve::new(0.02_f64);
        let times = grid();
        let spread_at = |loading: f64| {
            let copula = OneFactorCopula::new(loading, 15).unwrap();
            let table = copula.condition_curve(&times, &curve).unwrap();
            let k = times.len() - 1;
            let col: Vec<f64> = (0..table.n_points())
                .map(|q| table.survival(k, q).unwrap())
                .collect();
            col.iter().cloned().fold(f64::MIN, f64::max)
                - col.iter().cloned().fold(f64::MAX, f64::min)
        };

        let s0 = spread_at(0.0);
        let s3 = spread_at(0.3);
        let s9 = spread_at(0.9);
        assert!(s0 < 1e-9);
        assert!(s3 > s0);
        assert!(s9 > s3);
    }

    #[test]
    fn full_loading_degenerates_to_indicator() {
        let copula = OneFactorCopula::new(1.0, 15).unwrap();
        let curve = FlatHazardCurve::new(0.05_f64);
        let table = copula.condition_curve(&grid(), &curve).unwrap();
        let k = grid().len() - 1;
        for q in 0..table.n_points() {
            let s = table.survival(k, q).unwrap();
            assert!(s == 0.0 || s == 1.0);
        }
    }

    #[test]
    fn conditional_curve_interpolates_and_extrapolates() {
        let copula = OneFactorCopula::new(0.0, 5).unwrap();
        let curve = FlatHazardCurve::new(0.02_f64);
        let times = vec![0.0, 1.0, 2.0];
        let table = copula.condition_curve(&times, &curve).unwrap();
        let view = table.conditional_curve(2).unwrap();

        let s1 = curve.survival_probability(1.0).unwrap();
        let s2 = curve.survival_probability(2.0).unwrap();
        assert_relative_eq!(view.survival(1.0), s1, epsilon = 1e-6);
        // Midpoint is the chord between grid values.
        assert_relative_eq!(view.survival(1.5), 0.5 * (s1 + s2), epsilon = 1e-6);
        // Flat extrapolation past the grid.
        assert_relative_eq!(view.survival(10.0), view.survival(2.0));
        assert_relative_eq!(
            view.exhaustion_probability(2.0),
            1.0 - view.survival(2.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn out_of_range_scenario_fails_fast() {
        let copula = OneFactorCopula::new(0.3, 5).unwrap();
        let curve = FlatHazardCurve::new(0.02_f64);
        let table = copula.condition_curve(&grid(), &curve).unwrap();
        assert!(table.conditional_curve(5).is_err());
        assert!(table.survival(0, 99).is_err());
    }
}
