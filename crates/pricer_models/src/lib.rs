//! # pricer_models: Model Layer of the Creditlink Pricing Toolkit
//!
//! Credit instruments, payoff machinery, and the conditional-distribution
//! models the simulation engine drives:
//!
//! - Normal-distribution primitives (`analytical::distributions`)
//! - Payment schedules and the valuation [`schedules::TimeGrid`]
//! - Credit instruments: single-name CDS and the credit-linked note
//!   (`instruments::credit`)
//! - One-factor Gaussian-copula conditioning: precomputed conditional
//!   survival tables and immutable per-scenario curve views (`copula`)
//! - The homogeneous-pool basket loss model behind tranche and
//!   nth-to-default payoffs (`basket`)
//! - The [`dynamic::DynamicPricer`] contract and its four variants
//!   (single name, basket CDS, nth-to-default, CDO tranche)
//!
//! ## Design Principles
//!
//! - Conditioning is **read-only**: tables are built once and queried by
//!   quadrature index; no workspace curve is ever overwritten in place
//! - Scenario selection (`evolve`) is an index swap with fail-fast
//!   validation, so variants stay cheap to re-condition inside the
//!   engine's inner quadrature loop
//! - Traits at the seams: the engine only sees [`dynamic::DynamicPricer`]
//!   and [`basket::BasketLossModel`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod basket;
pub mod copula;
pub mod dynamic;
pub mod instruments;
pub mod schedules;
