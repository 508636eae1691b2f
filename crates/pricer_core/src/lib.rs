//! # pricer_core: Foundation Layer for the Creditlink Pricing Toolkit
//!
//! The bottom layer of the workspace, providing the primitives every other
//! crate builds on:
//!
//! - Time types: [`types::time::Date`], [`types::time::DayCountConvention`]
//! - Structured error types: [`types::DateError`], [`types::InterpolationError`],
//!   [`types::PricingError`]
//! - Piecewise-linear interpolation (`math::interpolators`)
//! - Gauss-Hermite quadrature for factor expectations (`math::quadrature`)
//! - Market data curve traits and implementations (`market_data::curves`):
//!   discount curves, credit (survival) curves, and the credit-factor
//!   volatility term structure consumed by the simulation engine
//!
//! ## Zero Dependency Principle
//!
//! This layer depends on no other workspace crate and keeps external
//! dependencies minimal:
//! - `num-traits`: generic numerical computation over any float width
//! - `chrono`: date arithmetic
//! - `thiserror`: error derives
//! - `serde`: serialisation support (optional)
//!
//! ## Usage
//!
//! ```rust
//! use pricer_core::market_data::curves::{FlatCurve, YieldCurve};
//! use pricer_core::types::time::{Date, DayCountConvention};
//!
//! let start = Date::from_ymd(2026, 3, 20).unwrap();
//! let end = Date::from_ymd(2026, 9, 20).unwrap();
//! let t = DayCountConvention::Actual365Fixed.year_fraction(start, end);
//!
//! let curve = FlatCurve::new(0.02_f64);
//! let df = curve.discount_factor(t).unwrap();
//! assert!(df < 1.0 && df > 0.98);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
