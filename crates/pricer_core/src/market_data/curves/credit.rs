//! Interpolated hazard-rate curve.

use super::traits::CreditCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Piecewise-linear hazard-rate curve.
///
/// Stores `(tenor, hazard)` pillars; the hazard rate is linear between
/// pillars and flat beyond them, and the survival probability integrates
/// the hazard segment by segment:
///
/// ```text
/// S(t) = exp(-∫₀ᵗ λ(s) ds)
/// ```
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CreditCurve, HazardRateCurve};
///
/// let curve = HazardRateCurve::new(&[1.0_f64, 5.0], &[0.01, 0.02]).unwrap();
/// let s = curve.survival_probability(1.0).unwrap();
/// assert!((s - (-0.01_f64).exp()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct HazardRateCurve<T: Float> {
    tenors: Vec<T>,
    hazards: Vec<T>,
}

impl<T: Float> HazardRateCurve<T> {
    /// Constructs a curve from tenor/hazard pillars.
    ///
    /// Tenors must be positive and strictly increasing; hazards must be
    /// non-negative.
    ///
    /// # Errors
    ///
    /// - [`MarketDataError::InsufficientData`] with no pillars
    /// - [`MarketDataError::InvalidMaturity`] for non-increasing or
    ///   non-positive tenors
    /// - [`MarketDataError::OutOfBounds`] for negative hazards
    pub fn new(tenors: &[T], hazards: &[T]) -> Result<Self, MarketDataError> {
        if tenors.is_empty() || tenors.len() != hazards.len() {
            return Err(MarketDataError::InsufficientData {
                got: tenors.len().min(hazards.len()),
                need: 1,
            });
        }
        let mut prev = T::zero();
        for &t in tenors {
            if t <= prev {
                return Err(MarketDataError::InvalidMaturity {
                    t: t.to_f64().unwrap_or(0.0),
                });
            }
            prev = t;
        }
        for &h in hazards {
            if h < T::zero() {
                return Err(MarketDataError::OutOfBounds {
                    x: h.to_f64().unwrap_or(0.0),
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        Ok(Self {
            tenors: tenors.to_vec(),
            hazards: hazards.to_vec(),
        })
    }

    /// Hazard rate at time `t`: linear between pillars, flat outside.
    fn hazard_at(&self, t: T) -> T {
        let n = self.tenors.len();
        if t <= self.tenors[0] {
            return self.hazards[0];
        }
        if t >= self.tenors[n - 1] {
            return self.hazards[n - 1];
        }
        let mut i = 0;
        while i + 1 < n && self.tenors[i + 1] < t {
            i += 1;
        }
        let (t0, t1) = (self.tenors[i], self.tenors[i + 1]);
        let (h0, h1) = (self.hazards[i], self.hazards[i + 1]);
        h0 + (h1 - h0) * (t - t0) / (t1 - t0)
    }

    /// `∫₀ᵗ λ(s) ds` by trapezoidal accumulation over the pillar segments.
    fn integrated_hazard(&self, t: T) -> T {
        let two = T::from(2.0).unwrap();
        let mut integral = T::zero();
        let mut s0 = T::zero();
        let mut h0 = self.hazards[0];

        for &tenor in &self.tenors {
            let s1 = tenor.min(t);
            if s1 > s0 {
                let h1 = self.hazard_at(s1);
                integral = integral + (h0 + h1) / two * (s1 - s0);
                s0 = s1;
                h0 = h1;
            }
            if tenor >= t {
                break;
            }
        }
        // Flat tail beyond the last pillar.
        if t > s0 {
            integral = integral + self.hazards[self.tenors.len() - 1] * (t - s0);
        }
        integral
    }
}

impl<T: Float> CreditCurve<T> for HazardRateCurve<T> {
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }
        Ok((-self.integrated_hazard(t)).exp())
    }
}
