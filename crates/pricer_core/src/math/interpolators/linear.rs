//! Piecewise linear interpolation.

use super::Interpolator;
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator over sorted pillars.
///
/// Pillars are sorted by x-coordinate at construction; queries use a
/// binary search. Values outside the pillar domain extrapolate flat at
/// the boundary value, which keeps survival probabilities and discount
/// factors bounded when the engine queries slightly past the grid.
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0_f64, 1.0, 2.0], &[1.0, 0.9, 0.7]).unwrap();
/// assert!((interp.value(0.5).unwrap() - 0.95).abs() < 1e-12);
/// // Flat extrapolation on both sides.
/// assert_eq!(interp.value(-1.0).unwrap(), 1.0);
/// assert_eq!(interp.value(5.0).unwrap(), 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
}

impl<T: Float> LinearInterpolator<T> {
    /// Constructs an interpolator from pillar coordinates and values.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::InvalidInput`] when the slices differ in length
    /// - [`InterpolationError::InsufficientData`] with fewer than 2 pillars
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "xs and ys must have the same length: got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: xs.len(),
                need: 2,
            });
        }

        let mut pairs: Vec<(T, T)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        let (xs, ys): (Vec<T>, Vec<T>) = pairs.into_iter().unzip();

        Ok(Self { xs, ys })
    }

    /// Pillar x-coordinates, sorted ascending.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Pillar values, in x order.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Number of pillars.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed interpolator.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Index `i` with `xs[i] <= x < xs[i+1]`, clamped to `[0, n-2]`.
    #[inline]
    fn segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.saturating_sub(1).min(self.xs.len() - 2)
    }
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn value(&self, x: T) -> Result<T, InterpolationError> {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return Ok(self.ys[0]);
        }
        if x >= self.xs[n - 1] {
            return Ok(self.ys[n - 1]);
        }

        let i = self.segment(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let dx = x1 - x0;
        if dx == T::zero() {
            return Ok(y0);
        }
        Ok(y0 + (y1 - y0) * (x - x0) / dx)
    }

    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
