//! Systemic credit-factor path simulation.

use pricer_core::market_data::curves::VolatilityCurve;
use pricer_core::market_data::error::MarketDataError;

use crate::rng::PricerRng;

/// One simulated trajectory of the systemic credit factor.
///
/// `values[k]` is the factor level at grid time `k` (the first entry is
/// always 0, the factor's conditioning origin). `weight` is the
/// trajectory's non-negative probability mass in the weighted reduction;
/// generated paths carry weight 1, but the reduction accepts arbitrary
/// non-negative weights.
#[derive(Debug, Clone)]
pub struct FactorPath {
    /// Factor level at each grid time.
    pub values: Vec<f64>,
    /// Probability weight of this trajectory.
    pub weight: f64,
}

/// Generates driftless Gaussian factor paths over a fixed time grid.
///
/// The step over `[tₖ, tₖ₊₁]` is `σ(tₖ)·√Δt·ε` with `σ` read from the
/// credit-factor volatility curve at the interval start and `ε` standard
/// normal. Volatilities are resolved once at construction so generation
/// is allocation-light and any curve error surfaces eagerly.
pub struct FactorPathGenerator {
    sigma_sqrt_dt: Vec<f64>,
    n_times: usize,
}

impl FactorPathGenerator {
    /// Builds a generator for the given grid and volatility term structure.
    ///
    /// Duplicated grid times produce zero-length steps, which contribute
    /// no variance.
    ///
    /// # Errors
    ///
    /// Volatility curve lookups surface as [`MarketDataError`].
    pub fn new<V: VolatilityCurve<f64>>(
        vol_curve: &V,
        times: &[f64],
    ) -> Result<Self, MarketDataError> {
        let mut sigma_sqrt_dt = Vec::with_capacity(times.len().saturating_sub(1));
        for k in 0..times.len().saturating_sub(1) {
            let dt = (times[k + 1] - times[k]).max(0.0);
            let sigma = vol_curve.volatility(times[k])?;
            sigma_sqrt_dt.push(sigma * dt.sqrt());
        }
        Ok(Self {
            sigma_sqrt_dt,
            n_times: times.len(),
        })
    }

    /// Generates `n_paths` trajectories, each with weight 1.
    ///
    /// A fixed `seed` makes the path set reproducible.
    pub fn generate(&self, n_paths: usize, seed: Option<u64>) -> Vec<FactorPath> {
        let mut rng = match seed {
            Some(s) => PricerRng::from_seed(s),
            None => PricerRng::from_entropy(),
        };

        (0..n_paths)
            .map(|_| {
                let mut values = Vec::with_capacity(self.n_times);
                let mut x = 0.0;
                values.push(x);
                for &scale in &self.sigma_sqrt_dt {
                    x += scale * rng.gen_normal();
                    values.push(x);
                }
                FactorPath { values, weight: 1.0 }
            })
            .collect()
    }
}
