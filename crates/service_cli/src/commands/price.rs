//! Price command: values a demonstration credit-linked note.

use tracing::{debug, info};

use pricer_core::market_data::curves::{FlatCurve, FlatHazardCurve, FlatVolCurve};
use pricer_core::types::time::Date;
use pricer_models::copula::OneFactorCopula;
use pricer_models::dynamic::SingleNameDynamicPricer;
use pricer_models::instruments::credit::{CreditLinkedNote, RecoveryTiming};
use pricer_models::schedules::{Frequency, ScheduleBuilder, StepUnit, TimeGridBuilder};
use pricer_pricing::mc::{ContingentLegEngine, SimulationConfig};
use pricer_pricing::note::NotePricer;

use crate::config::PriceConfig;
use crate::Result;

/// Runs the price command.
pub fn run(
    config: PriceConfig,
    valuation: Option<&str>,
    n_paths: usize,
    seed: Option<u64>,
    recovery_at_maturity: bool,
) -> Result<()> {
    let valuation = match valuation {
        Some(s) => Date::parse(s)?,
        None => Date::today(),
    };
    let maturity = valuation.add_months(12 * config.years)?;

    info!("Pricing single-name credit-linked note");
    info!("  valuation {} maturity {}", valuation, maturity);
    info!("  paths {} seed {:?}", n_paths, seed);
    debug!("  market: {:?}", config);

    let discount = FlatCurve::new(config.rate);
    let vol_curve = FlatVolCurve::new(config.volatility);
    let reference = FlatHazardCurve::new(config.hazard);

    let times = TimeGridBuilder::new()
        .start(valuation)
        .maturity(maturity)
        .step(3, StepUnit::Months)
        .build()?
        .year_fractions(valuation, Default::default());

    let copula = OneFactorCopula::from_correlation(config.correlation, 25)?;
    let mut pricer = SingleNameDynamicPricer::new(
        &reference,
        &copula,
        &times,
        &discount,
        config.recovery,
        config.spread,
    )?;

    let mut sim = SimulationConfig::builder().n_paths(n_paths);
    if let Some(seed) = seed {
        sim = sim.seed(seed);
    }
    let timing = if recovery_at_maturity {
        RecoveryTiming::AtMaturity
    } else {
        RecoveryTiming::AtDefault
    };
    let engine =
        ContingentLegEngine::new(valuation, valuation, maturity, sim.build()?, &discount, &vol_curve)?
            .with_recovery_timing(timing);

    let coupon_schedule = ScheduleBuilder::new()
        .start(valuation)
        .end(maturity)
        .frequency(Frequency::Quarterly)
        .build()?;
    let note = CreditLinkedNote::new(1.0, config.coupon, coupon_schedule, timing, None);

    let result = NotePricer::new(engine, valuation, &discount).price(&note, &mut pricer)?;

    println!();
    println!("┌──────────────────────┬────────────┐");
    println!("│ Leg                  │ PV         │");
    println!("├──────────────────────┼────────────┤");
    println!("│ Fee + principal      │ {:>10.6} │", result.fee_leg_pv);
    println!("│ Contingent (embedded)│ {:>10.6} │", result.contingent_leg_pv);
    println!("├──────────────────────┼────────────┤");
    println!("│ Note                 │ {:>10.6} │", result.pv);
    println!("└──────────────────────┴────────────┘");

    info!("Pricing complete");
    Ok(())
}
