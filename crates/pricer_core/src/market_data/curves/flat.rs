//! Flat (single-parameter) curve implementations.
//!
//! Used pervasively in tests and as the simplest production inputs.

use super::traits::{CreditCurve, VolatilityCurve, YieldCurve};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Flat continuously-compounded discount curve: `D(t) = exp(-r·t)`.
#[derive(Debug, Clone, Copy)]
pub struct FlatCurve<T: Float> {
    rate: T,
}

impl<T: Float> FlatCurve<T> {
    /// Creates a flat curve at the given zero rate.
    pub fn new(rate: T) -> Self {
        Self { rate }
    }

    /// The flat zero rate.
    #[inline]
    pub fn rate(&self) -> T {
        self.rate
    }
}

impl<T: Float> YieldCurve<T> for FlatCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.rate * t).exp())
    }
}

/// Flat hazard-rate curve: `S(t) = exp(-λ·t)`.
#[derive(Debug, Clone, Copy)]
pub struct FlatHazardCurve<T: Float> {
    hazard: T,
}

impl<T: Float> FlatHazardCurve<T> {
    /// Creates a flat curve at the given hazard rate.
    pub fn new(hazard: T) -> Self {
        Self { hazard }
    }

    /// The flat hazard rate.
    #[inline]
    pub fn hazard(&self) -> T {
        self.hazard
    }
}

impl<T: Float> CreditCurve<T> for FlatHazardCurve<T> {
    fn survival_probability(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok((-self.hazard * t).exp())
    }
}

/// Flat factor-volatility curve: `σ(t) = σ`.
#[derive(Debug, Clone, Copy)]
pub struct FlatVolCurve<T: Float> {
    vol: T,
}

impl<T: Float> FlatVolCurve<T> {
    /// Creates a flat volatility curve.
    pub fn new(vol: T) -> Self {
        Self { vol }
    }

    /// The flat volatility.
    #[inline]
    pub fn vol(&self) -> T {
        self.vol
    }
}

impl<T: Float> VolatilityCurve<T> for FlatVolCurve<T> {
    fn volatility(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        Ok(self.vol)
    }
}
