//! The stochastic contingent-leg valuation engine.

use rayon::prelude::*;

use pricer_core::market_data::curves::{CreditCurve, VolatilityCurve, YieldCurve};
use pricer_core::market_data::error::MarketDataError;
use pricer_core::types::time::{Date, DayCountConvention};
use pricer_models::copula::{ConditionalSurvivalTable, OneFactorCopula};
use pricer_models::dynamic::DynamicPricer;
use pricer_models::instruments::credit::{PaymentStream, RecoveryTiming};
use pricer_models::schedules::{StepUnit, TimeGridBuilder};

use super::config::SimulationConfig;
use super::error::EngineError;
use super::factor::{FactorPath, FactorPathGenerator};

/// Collateral description attached to an engine.
struct CollateralSpec<'a> {
    stream: PaymentStream,
    recovery: f64,
    /// Marginal curve and factor loading of a defaultable collateral
    /// issuer; `None` means the collateral is risk-free.
    credit: Option<(&'a dyn CreditCurve<f64>, f64)>,
}

/// Contingent-leg valuation engine for credit-linked notes.
///
/// One engine instance performs one valuation: it builds the time grid,
/// conditions the supplied [`DynamicPricer`] and the (optional) risky
/// collateral on each inner quadrature column to assemble a payoff grid,
/// then simulates systemic-factor paths and reduces path-weighted payoffs
/// to a single present value.
///
/// All times are year fractions from the valuation date; the settle date
/// anchors the grid start. The collateral payment stream must be built
/// with the same valuation-date anchor.
///
/// The collateral and the reference derivative are conditioned with the
/// *same* quadrature index: the model treats the systemic factor as
/// shared between them.
pub struct ContingentLegEngine<'a, D: YieldCurve<f64>, V: VolatilityCurve<f64>> {
    valuation: Date,
    settle: Date,
    maturity: Date,
    step: (u32, StepUnit),
    day_count: DayCountConvention,
    config: SimulationConfig,
    discount: &'a D,
    vol_curve: &'a V,
    recovery_timing: RecoveryTiming,
    collateral: Option<CollateralSpec<'a>>,
}

impl<'a, D: YieldCurve<f64>, V: VolatilityCurve<f64>> ContingentLegEngine<'a, D, V> {
    /// Creates an engine with a quarterly default grid step, ACT/365F
    /// times, and recovery paid at default.
    ///
    /// # Errors
    ///
    /// [`EngineError::SettleBeforeValuation`] when `settle < valuation`.
    pub fn new(
        valuation: Date,
        settle: Date,
        maturity: Date,
        config: SimulationConfig,
        discount: &'a D,
        vol_curve: &'a V,
    ) -> Result<Self, EngineError> {
        if settle < valuation {
            return Err(EngineError::SettleBeforeValuation { valuation, settle });
        }
        Ok(Self {
            valuation,
            settle,
            maturity,
            step: TimeGridBuilder::DEFAULT_STEP,
            day_count: DayCountConvention::Actual365Fixed,
            config,
            discount,
            vol_curve,
            recovery_timing: RecoveryTiming::AtDefault,
            collateral: None,
        })
    }

    /// Overrides the grid step.
    pub fn with_step(mut self, size: u32, unit: StepUnit) -> Self {
        self.step = (size, unit);
        self
    }

    /// Overrides the day count used to map grid dates to year fractions.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets when recovery value is paid after exhaustion.
    pub fn with_recovery_timing(mut self, timing: RecoveryTiming) -> Self {
        self.recovery_timing = timing;
        self
    }

    /// Attaches a risk-free collateral stream.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidRecovery`] for recovery outside `[0, 1]`.
    pub fn with_collateral(
        mut self,
        stream: PaymentStream,
        recovery: f64,
    ) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&recovery) || recovery.is_nan() {
            return Err(MarketDataError::InvalidRecovery { recovery }.into());
        }
        self.collateral = Some(CollateralSpec {
            stream,
            recovery,
            credit: None,
        });
        Ok(self)
    }

    /// Attaches a defaultable collateral stream whose issuer loads on the
    /// same systemic factor as the reference derivative.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidRecovery`] or
    /// [`MarketDataError::InvalidCorrelation`] for parameters outside
    /// their ranges.
    pub fn with_risky_collateral(
        mut self,
        stream: PaymentStream,
        recovery: f64,
        curve: &'a dyn CreditCurve<f64>,
        loading: f64,
    ) -> Result<Self, EngineError> {
        if !(0.0..=1.0).contains(&recovery) || recovery.is_nan() {
            return Err(MarketDataError::InvalidRecovery { recovery }.into());
        }
        if !(-1.0..=1.0).contains(&loading) || loading.is_nan() {
            return Err(MarketDataError::InvalidCorrelation { rho: loading }.into());
        }
        self.collateral = Some(CollateralSpec {
            stream,
            recovery,
            credit: Some((curve, loading)),
        });
        Ok(self)
    }

    /// Year fractions of the valuation grid (settle → maturity).
    fn grid_times(&self) -> Result<Vec<f64>, EngineError> {
        let grid = TimeGridBuilder::new()
            .start(self.settle)
            .maturity(self.maturity)
            .step(self.step.0, self.step.1)
            .build()?;
        Ok(grid.year_fractions(self.valuation, self.day_count))
    }

    /// Builds the `[interval][scenario]` payoff grid.
    ///
    /// Sequential by design: `evolve` and the collateral conditioning
    /// mutate per-scenario state that must not be driven from two threads.
    fn build_payoff_grid<P: DynamicPricer>(
        &self,
        pricer: &mut P,
        times: &[f64],
        dfs: &[f64],
        coll_table: Option<&ConditionalSurvivalTable>,
    ) -> Result<Vec<Vec<f64>>, EngineError> {
        let n_intervals = times.len() - 1;
        let n_scenarios = pricer.quadrature().len();
        let df_maturity = dfs[dfs.len() - 1];

        let mut cells = vec![vec![0.0; n_scenarios]; n_intervals];
        for q in 0..n_scenarios {
            pricer.evolve(q)?;
            let coll_view = match coll_table {
                Some(table) => Some(table.conditional_curve(q)?),
                None => None,
            };

            for (k, row) in cells.iter_mut().enumerate() {
                let (t0, t1) = (times[k], times[k + 1]);
                if t1 <= t0 {
                    continue;
                }
                let mut cell = 0.0;

                // Collateral-default unwind: recovery on the collateral
                // plus the mark of the reference position, floored at
                // zero, weighted by the collateral default mass realised
                // in the interval.
                if let (Some(spec), Some(view)) = (&self.collateral, &coll_view) {
                    let default_mass = (view.survival(t0) - view.survival(t1)).max(0.0);
                    if default_mass > 0.0 {
                        let unwind = (spec.recovery + pricer.pv(t0)?).max(0.0);
                        cell += dfs[k] * unwind * default_mass;
                    }
                }

                // Exhaustion of the reference derivative: the contingent
                // payment net of collateral value, floored at zero, paid
                // at default time or at maturity.
                let payment = pricer.contingent_payment(t0, t1)?;
                let coll_pv = match (&self.collateral, &coll_view) {
                    (Some(spec), Some(view)) => spec
                        .stream
                        .present_value(t0, self.discount, |u| view.survival(u), false)
                        .map_err(EngineError::from)?,
                    (Some(spec), None) => spec
                        .stream
                        .present_value(t0, self.discount, |_| 1.0, false)
                        .map_err(EngineError::from)?,
                    (None, _) => 0.0,
                };
                let intrinsic = (payment - coll_pv).max(0.0);
                let df_payout = match self.recovery_timing {
                    RecoveryTiming::AtDefault => dfs[k],
                    RecoveryTiming::AtMaturity => df_maturity,
                };
                cell += intrinsic * df_payout * pricer.exhaustion_indicator(t0, t1)?;

                row[q] = cell;
            }
        }
        Ok(cells)
    }

    /// Values the contingent leg per unit notional.
    ///
    /// Returns 0 when the grid has no usable interval. Setup errors
    /// (curves, configuration, pricer state) surface immediately.
    pub fn contingent_leg_pv<P: DynamicPricer>(&self, pricer: &mut P) -> Result<f64, EngineError> {
        self.config.validate()?;

        let times = self.grid_times()?;
        if times.len() < 2 {
            return Ok(0.0);
        }

        let mut dfs = Vec::with_capacity(times.len());
        for &t in &times {
            dfs.push(
                self.discount
                    .discount_factor(t)
                    .map_err(EngineError::from)?,
            );
        }

        let coll_table = match self.collateral.as_ref().and_then(|c| c.credit) {
            Some((curve, loading)) => {
                let copula = OneFactorCopula::new(loading, pricer.quadrature().len())?;
                Some(copula.condition_curve(&times, curve)?)
            }
            None => None,
        };

        let cells = self.build_payoff_grid(pricer, &times, &dfs, coll_table.as_ref())?;

        let generator = FactorPathGenerator::new(self.vol_curve, &times)?;
        let paths = generator.generate(self.config.n_paths(), self.config.seed());

        Ok(reduce_weighted_paths(
            &cells,
            pricer.quadrature().points(),
            &paths,
        ))
    }
}

/// Linear interpolation across the quadrature abscissae, clamped at the
/// extreme nodes.
fn interp_across_nodes(nodes: &[f64], row: &[f64], x: f64) -> f64 {
    let n = nodes.len();
    if n == 1 || x <= nodes[0] {
        return row[0];
    }
    if x >= nodes[n - 1] {
        return row[n - 1];
    }
    let pos = nodes.partition_point(|&z| z <= x);
    let i = pos.saturating_sub(1).min(n - 2);
    let dz = nodes[i + 1] - nodes[i];
    if dz <= 0.0 {
        return row[i];
    }
    row[i] + (row[i + 1] - row[i]) * (x - nodes[i]) / dz
}

/// Parallel weighted reduction of factor paths against a payoff grid.
///
/// Each path walks the grid intervals, resolving `cells[k][·]` at its
/// realised factor value by interpolation across the quadrature `nodes`,
/// and contributes `(weight × Σ contributions, weight)` to per-task
/// partials. Partials are combined exactly once in a commutative reduce,
/// so the result is invariant to path order up to floating-point
/// rounding.
///
/// Containment guarantees:
/// - a path with a non-finite contribution is dropped (its weight still
///   counts toward the mass), so one bad path cannot poison the estimate
/// - negative weights are treated as zero
/// - zero total mass yields 0.0, never NaN
pub fn reduce_weighted_paths(cells: &[Vec<f64>], nodes: &[f64], paths: &[FactorPath]) -> f64 {
    let (weighted_sum, mass) = paths
        .par_iter()
        .map(|path| {
            let weight = path.weight.max(0.0);
            if weight == 0.0 {
                return (0.0, 0.0);
            }
            let mut contribution = 0.0;
            for (k, row) in cells.iter().enumerate() {
                let x = path.values.get(k).copied().unwrap_or(0.0);
                contribution += interp_across_nodes(nodes, row, x);
            }
            if contribution.is_finite() {
                (weight * contribution, weight)
            } else {
                (0.0, weight)
            }
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    if mass > 0.0 {
        weighted_sum / mass
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_path(values: Vec<f64>, weight: f64) -> FactorPath {
        FactorPath { values, weight }
    }

    #[test]
    fn interp_across_nodes_clamps_and_interpolates() {
        let nodes = [-1.0, 0.0, 1.0];
        let row = [10.0, 20.0, 40.0];
        assert_eq!(interp_across_nodes(&nodes, &row, -5.0), 10.0);
        assert_eq!(interp_across_nodes(&nodes, &row, 5.0), 40.0);
        assert_relative_eq!(interp_across_nodes(&nodes, &row, 0.5), 30.0);
        assert_relative_eq!(interp_across_nodes(&nodes, &row, 0.0), 20.0);
    }

    #[test]
    fn reduction_is_weighted_average_for_constant_rows() {
        // Identical columns: every path resolves the same cell values.
        let cells = vec![vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]];
        let nodes = [-1.0, 0.0, 1.0];
        let paths = vec![
            flat_path(vec![0.0, 0.3, -0.2], 2.0),
            flat_path(vec![0.0, -0.8, 0.5], 1.0),
        ];
        let value = reduce_weighted_paths(&cells, &nodes, &paths);
        assert_relative_eq!(value, 3.0, max_relative = 1e-12);
    }

    #[test]
    fn reduction_zero_mass_returns_zero() {
        let cells = vec![vec![1.0, 2.0]];
        let nodes = [-1.0, 1.0];
        let paths = vec![
            flat_path(vec![0.0, 0.0], 0.0),
            flat_path(vec![0.0, 1.0], 0.0),
        ];
        let value = reduce_weighted_paths(&cells, &nodes, &paths);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn reduction_is_order_invariant() {
        let cells = vec![vec![1.0, 3.0, 9.0], vec![0.5, 0.25, 4.0]];
        let nodes = [-1.0, 0.0, 1.0];
        let mut paths: Vec<FactorPath> = (0..200)
            .map(|i| {
                let x = (i as f64 / 100.0) - 1.0;
                flat_path(vec![0.0, x, -x], 1.0 + (i % 7) as f64)
            })
            .collect();

        let forward = reduce_weighted_paths(&cells, &nodes, &paths);
        paths.reverse();
        let reversed = reduce_weighted_paths(&cells, &nodes, &paths);
        assert_relative_eq!(forward, reversed, max_relative = 1e-9);
    }

    #[test]
    fn reduction_drops_non_finite_contributions() {
        let cells = vec![vec![f64::NAN, f64::NAN]];
        let nodes = [-1.0, 1.0];
        let paths = vec![flat_path(vec![0.5], 1.0)];
        let value = reduce_weighted_paths(&cells, &nodes, &paths);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn reduction_ignores_negative_weights() {
        let cells = vec![vec![4.0, 4.0]];
        let nodes = [-1.0, 1.0];
        let paths = vec![
            flat_path(vec![0.0], -3.0),
            flat_path(vec![0.0], 1.0),
        ];
        let value = reduce_weighted_paths(&cells, &nodes, &paths);
        assert_relative_eq!(value, 4.0, max_relative = 1e-12);
    }
}
