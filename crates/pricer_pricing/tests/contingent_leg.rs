//! End-to-end tests of the contingent-leg engine.

use approx::assert_relative_eq;

use pricer_core::market_data::curves::{
    CreditCurve, FlatCurve, FlatHazardCurve, FlatVolCurve, HazardRateCurve, PiecewiseVolCurve,
};
use pricer_core::types::time::{Date, DayCountConvention};
use pricer_models::basket::HomogeneousPool;
use pricer_models::copula::OneFactorCopula;
use pricer_models::dynamic::{
    BasketCdsDynamicPricer, NthToDefaultDynamicPricer, SingleNameDynamicPricer,
    TrancheDynamicPricer,
};
use pricer_models::instruments::credit::{PaymentStream, RecoveryTiming};
use pricer_models::schedules::{StepUnit, TimeGridBuilder};
use pricer_pricing::mc::{
    reduce_weighted_paths, ContingentLegEngine, FactorPath, FactorPathGenerator, SimulationConfig,
};

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn grid_times(settle: Date, maturity: Date, step_months: u32) -> Vec<f64> {
    TimeGridBuilder::new()
        .start(settle)
        .maturity(maturity)
        .step(step_months, StepUnit::Months)
        .build()
        .unwrap()
        .year_fractions(settle, DayCountConvention::Actual365Fixed)
}

fn config(n_paths: usize, seed: u64) -> SimulationConfig {
    SimulationConfig::builder()
        .n_paths(n_paths)
        .seed(seed)
        .build()
        .unwrap()
}

/// Discretised protection-leg expectation on the same grid the engine
/// uses: Σ D(tₖ)·(S(tₖ) − S(tₖ₊₁))·lgd.
fn closed_form_protection(times: &[f64], rate: f64, hazard: f64, lgd: f64) -> f64 {
    let mut total = 0.0;
    for k in 0..times.len() - 1 {
        let df = (-rate * times[k]).exp();
        let dp = (-hazard * times[k]).exp() - (-hazard * times[k + 1]).exp();
        total += df * dp * lgd;
    }
    total
}

#[test]
fn boundary_scenario_collapses_to_closed_form() {
    // Single-name note, no collateral, zero correlation, flat curves: the
    // quadrature/simulation machinery must collapse to the discretised
    // closed-form expectation.
    let valuation = date(2026, 3, 20);
    let maturity = date(2028, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.01_f64);
    let copula = OneFactorCopula::new(0.0, 25).unwrap();
    let mut pricer =
        SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.005).unwrap();

    let engine = ContingentLegEngine::new(
        valuation,
        valuation,
        maturity,
        config(500, 42),
        &discount,
        &vol,
    )
    .unwrap();

    let value = engine.contingent_leg_pv(&mut pricer).unwrap();
    let expected = closed_form_protection(&times, 0.02, 0.01, 0.6);
    assert_relative_eq!(value, expected, max_relative = 1e-9);
}

#[test]
fn concrete_scenario_matches_hand_computed_expectation() {
    // Grid {T0, +3m, +6m, M}, flat 2% discount, 1% hazard, zero
    // correlation, recovery 40%, recovery at default.
    let valuation = date(2026, 1, 15);
    let maturity = date(2026, 10, 15);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.25_f64);
    let curve = FlatHazardCurve::new(0.01_f64);
    let copula = OneFactorCopula::new(0.0, 25).unwrap();
    let mut pricer =
        SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();

    let engine = ContingentLegEngine::new(
        valuation,
        valuation,
        maturity,
        config(1000, 7),
        &discount,
        &vol,
    )
    .unwrap()
    .with_recovery_timing(RecoveryTiming::AtDefault);

    let value = engine.contingent_leg_pv(&mut pricer).unwrap();
    let expected = closed_form_protection(&times, 0.02, 0.01, 0.6);
    assert!(
        (value - expected).abs() < 1e-6,
        "value {} vs expected {}",
        value,
        expected
    );
}

#[test]
fn empty_grid_returns_zero() {
    let valuation = date(2026, 3, 20);
    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.01_f64);
    let copula = OneFactorCopula::new(0.0, 9).unwrap();
    let times = vec![0.0, 1.0];
    let mut pricer =
        SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();

    // Maturity on the settle date: the grid is the single date [maturity].
    let engine = ContingentLegEngine::new(
        valuation,
        valuation,
        valuation,
        config(100, 1),
        &discount,
        &vol,
    )
    .unwrap();
    assert_eq!(engine.contingent_leg_pv(&mut pricer).unwrap(), 0.0);
}

#[test]
fn zero_mass_reduction_returns_zero_not_nan() {
    let vol = FlatVolCurve::new(0.3_f64);
    let times: Vec<f64> = (0..=8).map(|i| i as f64 * 0.25).collect();
    let generator = FactorPathGenerator::new(&vol, &times).unwrap();
    let mut paths = generator.generate(50, Some(3));
    for path in &mut paths {
        path.weight = 0.0;
    }

    let cells = vec![vec![0.5, 1.0, 2.0]; times.len() - 1];
    let nodes = [-1.0, 0.0, 1.0];
    let value = reduce_weighted_paths(&cells, &nodes, &paths);
    assert_eq!(value, 0.0);
    assert!(!value.is_nan());
}

#[test]
fn reduction_is_invariant_to_path_order() {
    let vol = FlatVolCurve::new(0.4_f64);
    let times: Vec<f64> = (0..=12).map(|i| i as f64 * 0.25).collect();
    let generator = FactorPathGenerator::new(&vol, &times).unwrap();
    let mut paths = generator.generate(2000, Some(11));

    // Give the paths uneven weights so ordering could plausibly matter.
    for (i, path) in paths.iter_mut().enumerate() {
        path.weight = 1.0 + (i % 13) as f64 * 0.25;
    }

    let nodes: Vec<f64> = (-3..=3).map(|i| i as f64).collect();
    let cells: Vec<Vec<f64>> = (0..times.len() - 1)
        .map(|k| nodes.iter().map(|z| 0.01 * (k as f64 + 1.0) * (1.0 + z)).collect())
        .collect();

    let forward = reduce_weighted_paths(&cells, &nodes, &paths);

    // Reverse and interleave the path order.
    let mut shuffled: Vec<FactorPath> = Vec::with_capacity(paths.len());
    let half = paths.len() / 2;
    for i in 0..half {
        shuffled.push(paths[paths.len() - 1 - i].clone());
        shuffled.push(paths[i].clone());
    }
    let backward = reduce_weighted_paths(&cells, &nodes, &shuffled);

    assert_relative_eq!(forward, backward, max_relative = 1e-9);
}

#[test]
fn same_seed_reproduces_the_valuation() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2029, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.35_f64);
    let curve = FlatHazardCurve::new(0.02_f64);
    let copula = OneFactorCopula::new(0.6, 25).unwrap();

    let run = |seed: u64| {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        let engine = ContingentLegEngine::new(
            valuation,
            valuation,
            maturity,
            config(2000, seed),
            &discount,
            &vol,
        )
        .unwrap();
        engine.contingent_leg_pv(&mut pricer).unwrap()
    };

    // The parallel reduce may regroup partial sums between runs, so the
    // match is exact only up to floating-point rounding.
    assert_relative_eq!(run(42), run(42), max_relative = 1e-12);
    // Correlated scenario with factor risk: different path sets move the
    // estimate measurably.
    assert!((run(42) - run(43)).abs() > 0.0);
}

#[test]
fn contingent_leg_is_bounded_by_lgd() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2031, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.5_f64);
    let curve = HazardRateCurve::new(&[1.0, 3.0, 5.0], &[0.03, 0.04, 0.05]).unwrap();

    for loading in [0.0, 0.4, 0.8] {
        let copula = OneFactorCopula::new(loading, 25).unwrap();
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        let engine = ContingentLegEngine::new(
            valuation,
            valuation,
            maturity,
            config(2000, 9),
            &discount,
            &vol,
        )
        .unwrap();
        let value = engine.contingent_leg_pv(&mut pricer).unwrap();
        assert!(value >= 0.0 && value <= 0.6, "loading {}: {}", loading, value);
    }
}

#[test]
fn collateral_value_offsets_the_contingent_payment() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2028, 3, 20);
    let times = grid_times(valuation, maturity, 3);
    let t_maturity = *times.last().unwrap();

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.02_f64);
    let copula = OneFactorCopula::new(0.0, 25).unwrap();

    let bare = {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 5), &discount, &vol)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    // Zero-coupon collateral worth D(t, T)·0.5 at unwind.
    let stream = PaymentStream::new(vec![(t_maturity, 0.5)]);
    let collateralised = {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 5), &discount, &vol)
            .unwrap()
            .with_collateral(stream, 0.4)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    assert!(collateralised < bare);
    assert!(collateralised > 0.0);
}

#[test]
fn risky_collateral_adds_unwind_mass() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2028, 3, 20);
    let times = grid_times(valuation, maturity, 3);
    let t_maturity = *times.last().unwrap();

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.02_f64);
    let coll_curve = FlatHazardCurve::new(0.03_f64);
    let copula = OneFactorCopula::new(0.3, 25).unwrap();
    let stream = PaymentStream::new(vec![(t_maturity, 0.5)]);

    let risk_free = {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 5), &discount, &vol)
            .unwrap()
            .with_collateral(stream.clone(), 0.4)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    let risky = {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 5), &discount, &vol)
            .unwrap()
            .with_risky_collateral(stream, 0.4, &coll_curve as &dyn CreditCurve<f64>, 0.3)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    // Defaultable collateral both cheapens the offset and adds the unwind
    // term, so the contingent leg can only grow.
    assert!(risky >= risk_free);
}

#[test]
fn first_to_default_dominates_second_to_default() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2029, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.02_f64);
    let copula = OneFactorCopula::new(0.4, 15).unwrap();

    let ftd = {
        let pool = HomogeneousPool::new(5, 0.4, &copula, &times, &curve).unwrap();
        let mut pricer = BasketCdsDynamicPricer::new(pool, &times, &discount, 0.01);
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 13), &discount, &vol)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    let ntd2 = {
        let pool = HomogeneousPool::new(5, 0.4, &copula, &times, &curve).unwrap();
        let mut pricer =
            NthToDefaultDynamicPricer::new(pool, 2, &times, &discount, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 13), &discount, &vol)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    assert!(ftd > ntd2);
    assert!(ntd2 >= 0.0);
}

#[test]
fn equity_tranche_dominates_senior_tranche() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2031, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);
    let curve = FlatHazardCurve::new(0.03_f64);
    let copula = OneFactorCopula::new(0.5, 15).unwrap();

    let run = |attach: f64, detach: f64| {
        let pool = HomogeneousPool::new(10, 0.4, &copula, &times, &curve).unwrap();
        let mut pricer =
            TrancheDynamicPricer::new(pool, attach, detach, &times, &discount, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(500, 17), &discount, &vol)
            .unwrap()
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    let equity = run(0.0, 0.06);
    let senior = run(0.3, 0.6);
    assert!(equity > senior);
    assert!(senior >= 0.0);
}

#[test]
fn recovery_at_maturity_discounts_the_payout_harder() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2031, 3, 20);
    let times = grid_times(valuation, maturity, 3);

    let discount = FlatCurve::new(0.03_f64);
    let vol = PiecewiseVolCurve::new(&[1.0, 3.0], &[0.15, 0.25]).unwrap();
    let curve = FlatHazardCurve::new(0.02_f64);
    let copula = OneFactorCopula::new(0.0, 15).unwrap();

    let run = |timing: RecoveryTiming| {
        let mut pricer =
            SingleNameDynamicPricer::new(&curve, &copula, &times, &discount, 0.4, 0.01).unwrap();
        ContingentLegEngine::new(valuation, valuation, maturity, config(300, 23), &discount, &vol)
            .unwrap()
            .with_recovery_timing(timing)
            .contingent_leg_pv(&mut pricer)
            .unwrap()
    };

    assert!(run(RecoveryTiming::AtMaturity) < run(RecoveryTiming::AtDefault));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn reduction_order_invariance(seed in 0u64..1000, rotation in 1usize..500) {
            let vol = FlatVolCurve::new(0.3_f64);
            let times: Vec<f64> = (0..=8).map(|i| i as f64 * 0.25).collect();
            let generator = FactorPathGenerator::new(&vol, &times).unwrap();
            let mut paths = generator.generate(500, Some(seed));
            for (i, path) in paths.iter_mut().enumerate() {
                path.weight = (i % 5) as f64 * 0.5;
            }

            let nodes = [-2.0, -1.0, 0.0, 1.0, 2.0];
            let cells: Vec<Vec<f64>> = (0..times.len() - 1)
                .map(|k| nodes.iter().map(|z| 0.1 * (k as f64 + 1.0) + 0.05 * z).collect())
                .collect();

            let forward = reduce_weighted_paths(&cells, &nodes, &paths);
            let shift = rotation % paths.len();
            paths.rotate_left(shift);
            let rotated = reduce_weighted_paths(&cells, &nodes, &paths);
            prop_assert!((forward - rotated).abs() <= 1e-9 * forward.abs().max(1.0));
        }
    }
}

#[test]
fn invalid_inputs_are_rejected_before_simulation() {
    let valuation = date(2026, 3, 20);
    let maturity = date(2028, 3, 20);
    let discount = FlatCurve::new(0.02_f64);
    let vol = FlatVolCurve::new(0.3_f64);

    // Settle before valuation.
    assert!(ContingentLegEngine::new(
        valuation,
        date(2026, 3, 19),
        maturity,
        config(100, 1),
        &discount,
        &vol
    )
    .is_err());

    // Collateral recovery outside [0, 1].
    let engine =
        ContingentLegEngine::new(valuation, valuation, maturity, config(100, 1), &discount, &vol)
            .unwrap();
    assert!(engine
        .with_collateral(PaymentStream::new(vec![(1.0, 1.0)]), 1.5)
        .is_err());

    // Collateral loading outside [-1, 1].
    let coll_curve = FlatHazardCurve::new(0.02_f64);
    let engine =
        ContingentLegEngine::new(valuation, valuation, maturity, config(100, 1), &discount, &vol)
            .unwrap();
    assert!(engine
        .with_risky_collateral(
            PaymentStream::new(vec![(1.0, 1.0)]),
            0.4,
            &coll_curve as &dyn CreditCurve<f64>,
            1.2
        )
        .is_err());
}
