//! Interpolation over sorted pillar data.

mod linear;

pub use linear::LinearInterpolator;

use crate::types::InterpolationError;
use num_traits::Float;

/// One-dimensional interpolation over sorted `(x, y)` pillars.
///
/// Implementations extrapolate flat beyond the pillar domain, the
/// convention used for term-structure lookups throughout the workspace.
pub trait Interpolator<T: Float> {
    /// Interpolated value at `x`.
    fn value(&self, x: T) -> Result<T, InterpolationError>;

    /// The `(min, max)` extent of the pillar x-coordinates.
    fn domain(&self) -> (T, T);
}
