//! One-factor Gaussian-copula conditioning.
//!
//! The conditional-independence machinery behind every dynamic pricer:
//! given a marginal survival curve and a factor loading, precompute a
//! table of survival probabilities conditional on each Gauss-Hermite
//! realisation of the systemic factor, then hand out immutable
//! per-scenario curve views.

mod conditional;

pub use conditional::{ConditionalCurve, ConditionalSurvivalTable, OneFactorCopula};
