//! Piecewise factor-volatility term structure.

use super::traits::VolatilityCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Step volatility term structure for the systemic credit factor.
///
/// Each pillar `(tenor, vol)` gives the volatility that applies up to and
/// including that tenor; queries beyond the last pillar read the final
/// value. The path simulator samples this curve at the left end of each
/// grid interval.
#[derive(Debug, Clone)]
pub struct PiecewiseVolCurve<T: Float> {
    tenors: Vec<T>,
    vols: Vec<T>,
}

impl<T: Float> PiecewiseVolCurve<T> {
    /// Constructs a step curve from tenor/volatility pillars.
    ///
    /// Tenors must be positive and strictly increasing; vols non-negative.
    ///
    /// # Errors
    ///
    /// Mirrors [`crate::market_data::curves::HazardRateCurve::new`]:
    /// insufficient data, invalid tenors, or negative vols.
    pub fn new(tenors: &[T], vols: &[T]) -> Result<Self, MarketDataError> {
        if tenors.is_empty() || tenors.len() != vols.len() {
            return Err(MarketDataError::InsufficientData {
                got: tenors.len().min(vols.len()),
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
        for &v in vols {
            if v < T::zero() {
                return Err(MarketDataError::OutOfBounds {
                    x: v.to_f64().unwrap_or(0.0),
                    min: 0.0,
                    max: f64::INFINITY,
                });
            }
        }
        Ok(Self {
            tenors: tenors.to_vec(),
            vols: vols.to_vec(),
        })
    }
}

impl<T: Float> VolatilityCurve<T> for PiecewiseVolCurve<T> {
    fn volatility(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let idx = self.tenors.partition_point(|&tenor| tenor < t);
        Ok(self.vols[idx.min(self.vols.len() - 1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn step_lookup() {
        let curve = PiecewiseVolCurve::new(&[1.0, 3.0], &[0.1, 0.2]).unwrap();
        assert_relative_eq!(curve.volatility(0.5).unwrap(), 0.1);
        assert_relative_eq!(curve.volatility(1.0).unwrap(), 0.1);
        assert_relative_eq!(curve.volatility(2.0).unwrap(), 0.2);
        assert_relative_eq!(curve.volatility(10.0).unwrap(), 0.2);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(PiecewiseVolCurve::<f64>::new(&[], &[]).is_err());
        assert!(PiecewiseVolCurve::new(&[1.0, 1.0], &[0.1, 0.2]).is_err());
        assert!(PiecewiseVolCurve::new(&[1.0], &[-0.1]).is_err());
    }
}
