//! Gauss-Hermite quadrature.
//!
//! Two views of the same rule are provided:
//!
//! - [`GaussHermite`]: the physicists' convention with weight `exp(-x²)`,
//!   so `∫ f(x)·exp(-x²) dx ≈ Σ wᵢ f(xᵢ)` and the weights sum to `√π`.
//! - [`NormalQuadrature`]: the probabilist rescaling `zᵢ = √2·xᵢ`,
//!   `vᵢ = wᵢ/√π`, so `E[f(Z)] ≈ Σ vᵢ f(zᵢ)` for `Z ~ N(0,1)` and the
//!   weights sum to one. This is the form the one-factor copula and the
//!   simulation engine consume.
//!
//! Nodes are found by Newton iteration on the orthonormal Hermite
//! recurrence `p₊₁(x) = x·√(2/(j+1))·p − √(j/(j+1))·p₋₁`, seeded with the
//! standard asymptotic initial guesses; roots come out symmetric about
//! zero and are stored in ascending order.

use crate::types::PricingError;

/// Convergence tolerance for the Newton root polish.
const NODE_EPS: f64 = 1e-14;

/// Iteration cap for the Newton root polish.
const MAX_NEWTON_ITERATIONS: usize = 100;

/// Gauss-Hermite rule in the physicists' convention (weight `exp(-x²)`).
#[derive(Debug, Clone)]
pub struct GaussHermite {
    x: Vec<f64>,
    w: Vec<f64>,
}

impl GaussHermite {
    /// Builds a rule of the given order.
    ///
    /// # Errors
    ///
    /// [`PricingError::InvalidInput`] for order 0, or
    /// [`PricingError::NumericalInstability`] if a node fails to converge
    /// (not observed for any practical order).
    pub fn new(order: usize) -> Result<Self, PricingError> {
        if order == 0 {
            return Err(PricingError::InvalidInput(
                "quadrature order must be at least 1".to_string(),
            ));
        }

        let n = order;
        let mut x = vec![0.0_f64; n];
        let mut w = vec![0.0_f64; n];
        let m = (n + 1) / 2;

        let mut z = 0.0_f64;
        for i in 0..m {
            // Asymptotic initial guesses, largest root first.
            z = match i {
                0 => {
                    let an = 2.0 * n as f64 + 1.0;
                    an.sqrt() - 1.85575 * an.powf(-1.0 / 6.0)
                }
                1 => z - 1.14 * (n as f64).powf(0.426) / z,
                2 => 1.86 * z - 0.86 * x[n - 1],
                3 => 1.91 * z - 0.91 * x[n - 2],
                _ => 2.0 * z - x[n - i + 1],
            };

            let mut pp = 0.0_f64;
            let mut converged = false;
            for _ in 0..MAX_NEWTON_ITERATIONS {
                // Evaluate the orthonormal Hermite polynomial at z.
                let mut p1 = std::f64::consts::PI.powf(-0.25);
                let mut p2 = 0.0_f64;
                for j in 0..n {
                    let p3 = p2;
                    p2 = p1;
                    let jf = j as f64;
                    p1 = z * (2.0 / (jf + 1.0)).sqrt() * p2 - (jf / (jf + 1.0)).sqrt() * p3;
                }
                pp = (2.0 * n as f64).sqrt() * p2;
                let dz = p1 / pp;
                z -= dz;
                if dz.abs() <= NODE_EPS {
                    converged = true;
                    break;
                }
            }
            if !converged {
                return Err(PricingError::NumericalInstability(format!(
                    "Gauss-Hermite node {} of order {} did not converge",
                    i, n
                )));
            }

            // Store ascending: negative roots in the lower half.
            x[n - 1 - i] = z;
            x[i] = -z;
            let weight = 2.0 / (pp * pp);
            w[i] = weight;
            w[n - 1 - i] = weight;
        }

        Ok(Self { x, w })
    }

    /// Abscissae in ascending order.
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Weights matching [`Self::x`]; they sum to `√π`.
    #[inline]
    pub fn w(&self) -> &[f64] {
        &self.w
    }

    /// The rule's order.
    #[inline]
    pub fn order(&self) -> usize {
        self.x.len()
    }

    /// Approximates `∫ f(x)·exp(-x²) dx`.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.x.iter().zip(self.w.iter()).map(|(&x, &w)| w * f(x)).sum()
    }
}

/// Gauss-Hermite rule rescaled to standard-normal expectations.
///
/// # Example
///
/// ```
/// use pricer_core::math::quadrature::NormalQuadrature;
///
/// let quad = NormalQuadrature::new(25).unwrap();
/// // E[Z²] = 1 for Z ~ N(0,1)
/// let second_moment = quad.expectation(|z| z * z);
/// assert!((second_moment - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct NormalQuadrature {
    points: Vec<f64>,
    weights: Vec<f64>,
}

impl NormalQuadrature {
    /// Default number of quadrature points for factor expectations.
    pub const DEFAULT_POINTS: usize = 25;

    /// Builds a rule of the given order (see [`GaussHermite::new`] for errors).
    pub fn new(order: usize) -> Result<Self, PricingError> {
        let gh = GaussHermite::new(order)?;
        let sqrt_2 = std::f64::consts::SQRT_2;
        let sqrt_pi = std::f64::consts::PI.sqrt();
        let points = gh.x.iter().map(|&x| sqrt_2 * x).collect();
        let weights = gh.w.iter().map(|&w| w / sqrt_pi).collect();
        Ok(Self { points, weights })
    }

    /// Factor abscissae `zᵢ`, ascending.
    #[inline]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Probability weights `vᵢ`; they sum to one.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True only for the (unconstructable) empty rule.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Approximates `E[f(Z)]` for `Z ~ N(0,1)`.
    pub fn expectation<F: Fn(f64) -> f64>(&self, f: F) -> f64 {
        self.points
            .iter()
            .zip(self.weights.iter())
            .map(|(&z, &v)| v * f(z))
            .sum()
    }
}
