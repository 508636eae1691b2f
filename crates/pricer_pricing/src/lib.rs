//! # pricer_pricing: Simulation Engine for the Creditlink Pricing Toolkit
//!
//! The stochastic contingent-leg valuation kernel behind the credit-linked
//! note pricers:
//!
//! - Seeded random number generation (`rng`)
//! - Simulation configuration with validated builders (`mc::config`)
//! - Systemic credit-factor path generation over the valuation grid
//!   (`mc::factor`)
//! - The [`mc::ContingentLegEngine`]: inner one-factor quadrature over the
//!   reference derivative, outer weighted path simulation over the factor's
//!   own evolution, reduced in parallel with Rayon
//! - A note-level pricer combining fee and contingent legs (`note`)
//!
//! # Two-level design
//!
//! The engine never runs a joint Monte Carlo over every name. Conditional
//! independence closes the cross-sectional dimension with a quadrature at
//! each grid date; the only simulated object is the systemic factor's own
//! trajectory, the one true source of path dependence in the payoff.
//!
//! # Concurrency
//!
//! The inner quadrature loop is sequential because conditioning mutates
//! pricer scenario state. Only the per-path reduction runs on the Rayon
//! pool: each task folds `(weight × contribution, weight)` partials that
//! are combined exactly once in a commutative reduce, so the result is
//! independent of path order up to floating-point rounding.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod note;
pub mod rng;
