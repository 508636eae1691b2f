//! Curve trait definitions.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Discount curve.
///
/// # Contract
///
/// - `discount_factor(t)` returns `D(t)`, the present value of one unit
///   paid at time `t` (in years from the curve's anchor date)
/// - `D(0) = 1`, `D(t) > 0`, and `D` is non-increasing (no arbitrage)
///
/// Implementations must be generic over `T: Float` so curves work at any
/// float width.
pub trait YieldCurve<T: Float> {
    /// Discount factor for maturity `t >= 0`.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidMaturity`] when `t < 0`.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Discount factor between two future times, `D(t2)/D(t1)`.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidMaturity`] when `t2 < t1` or either is
    /// negative.
    fn forward_discount_factor(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t2 < t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        let d1 = self.discount_factor(t1)?;
        let d2 = self.discount_factor(t2)?;
        Ok(d2 / d1)
    }
}

/// Credit (survival) curve.
///
/// # Contract
///
/// - `survival_probability(t)` returns `P(τ > t)` in `[0, 1]`
/// - `P(τ > 0) = 1` and survival is non-increasing in `t`
pub trait CreditCurve<T: Float> {
    /// Survival probability `P(τ > t)` for `t >= 0`.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidMaturity`] when `t < 0`.
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError>;

    /// Default probability `P(τ <= t) = 1 - P(τ > t)`.
    fn default_probability(&self, t: T) -> Result<T, MarketDataError> {
        Ok(T::one() - self.survival_probability(t)?)
    }

    /// Conditional survival `P(τ > t2 | τ > t1) = S(t2)/S(t1)`.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidMaturity`] when `t2 < t1`.
    fn forward_survival_probability(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        if t2 < t1 {
            return Err(MarketDataError::InvalidMaturity {
                t: (t2 - t1).to_f64().unwrap_or(0.0),
            });
        }
        let s1 = self.survival_probability(t1)?;
        let s2 = self.survival_probability(t2)?;
        if s1 <= T::zero() {
            return Ok(T::zero());
        }
        Ok(s2 / s1)
    }
}

/// Volatility term structure of the systemic credit factor.
///
/// The path simulator reads `volatility(t)` as the instantaneous diffusion
/// coefficient over the grid interval starting at `t`.
pub trait VolatilityCurve<T: Float> {
    /// Instantaneous volatility at time `t >= 0`.
    ///
    /// # Errors
    ///
    /// [`MarketDataError::InvalidMaturity`] when `t < 0`.
    fn volatility(&self, t: T) -> Result<T, MarketDataError>;
}
