//! Tests for the incremental portfolio score calculator.
//!
//! Every incremental result is checked against an independent O(n²) oracle
//! that recomputes the quadratic risk sum, the ceiling excess, and the
//! return total from the current allocation list.

use markowitz_core::{
    AssetAllocation, AssetClass, CorrelationMatrix, HardSoftScore, Parametrization,
    PortfolioSolution,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::calculator::IncrementalScoreCalculator;
use crate::portfolio::PortfolioScoreCalculator;

/// Three classes with unit risk weights, so an allocation's quantity in
/// millis equals its quantified risk in micros. Quantities 1000/2000/1500,
/// correlations 300/-200/100 millis.
fn three_class_solution_with_ceiling(squared_risk_femtos_maximum: i64) -> PortfolioSolution {
    let classes = vec![
        AssetClass::new(0, "Domestic equities", 40, 1),
        AssetClass::new(1, "Foreign equities", 60, 1),
        AssetClass::new(2, "Government bonds", 50, 1),
    ];
    let correlations = CorrelationMatrix::builder(3)
        .set_symmetric(0, 1, 300)
        .set_symmetric(0, 2, -200)
        .set_symmetric(1, 2, 100)
        .build()
        .unwrap();
    let mut solution = PortfolioSolution::new(
        classes,
        correlations,
        Parametrization::new(squared_risk_femtos_maximum),
    )
    .unwrap();
    solution
        .add_allocation(AssetAllocation::assigned(0, 1000))
        .unwrap();
    solution
        .add_allocation(AssetAllocation::assigned(1, 2000))
        .unwrap();
    solution
        .add_allocation(AssetAllocation::assigned(2, 1500))
        .unwrap();
    solution
}

fn three_class_solution() -> PortfolioSolution {
    three_class_solution_with_ceiling(5_000_000)
}

fn oracle_squared_risk_femtos(solution: &PortfolioSolution) -> i64 {
    let allocations = solution.allocations();
    let mut total = 0i64;
    for (i, a) in allocations.iter().enumerate() {
        let a_risk = a.quantified_risk_micros(solution.asset_class_of(a));
        total += a_risk * a_risk * 1000;
        for (j, b) in allocations.iter().enumerate() {
            if i != j {
                let b_risk = b.quantified_risk_micros(solution.asset_class_of(b));
                total += a_risk
                    * b_risk
                    * solution.correlations().millis(a.asset_class, b.asset_class);
            }
        }
    }
    total
}

fn oracle_score(solution: &PortfolioSolution) -> HardSoftScore {
    let excess = oracle_squared_risk_femtos(solution)
        - solution.parametrization().squared_risk_femtos_maximum();
    let soft = solution
        .allocations()
        .iter()
        .map(|a| a.quantified_return_micros(solution.asset_class_of(a)))
        .sum();
    HardSoftScore::of(-excess.max(0), soft)
}

#[test]
fn test_reset_builds_exact_totals() {
    let solution = three_class_solution();
    let mut calculator = PortfolioScoreCalculator::new();
    assert!(!calculator.is_initialized());

    calculator.reset_working_solution(&solution);

    assert!(calculator.is_initialized());
    // selfs 1.0e9 + 4.0e9 + 2.25e9, crosses 2 * (6.0e8 - 3.0e8 + 3.0e8)
    assert_eq!(calculator.squared_risk_femtos(), 8_450_000_000);
    assert_eq!(calculator.squared_risk_femtos_maximum(), 5_000_000);
    assert_eq!(
        calculator.calculate_score(),
        HardSoftScore::of(-8_445_000_000, 235_000)
    );
    assert_eq!(
        calculator.squared_risk_femtos(),
        oracle_squared_risk_femtos(&solution)
    );
}

#[test]
fn test_quantity_change_matches_full_recompute() {
    let mut solution = three_class_solution();
    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);

    // Reallocate the foreign equities unit from 2000 to 2500.
    calculator.before_variable_changed(&solution, 1);
    solution.set_quantity_millis(1, Some(2500));
    calculator.after_variable_changed(&solution, 1);

    assert_eq!(calculator.squared_risk_femtos(), 11_150_000_000);
    assert_eq!(
        calculator.squared_risk_femtos(),
        oracle_squared_risk_femtos(&solution)
    );
    assert_eq!(
        calculator.calculate_score(),
        HardSoftScore::of(-11_145_000_000, 265_000)
    );

    // A fresh full build over the mutated solution agrees bit for bit.
    let mut fresh = PortfolioScoreCalculator::new();
    fresh.reset_working_solution(&solution);
    assert_eq!(fresh.squared_risk_femtos(), calculator.squared_risk_femtos());
    assert_eq!(fresh.calculate_score(), calculator.calculate_score());
}

#[test]
fn test_insert_then_retract_cancels_exactly() {
    let mut solution = three_class_solution();
    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);

    let risk_before = calculator.squared_risk_femtos();
    let score_before = calculator.calculate_score();

    calculator.before_entity_added(&solution, solution.allocations().len());
    let index = solution
        .add_allocation(AssetAllocation::assigned(2, 800))
        .unwrap();
    calculator.after_entity_added(&solution, index);
    assert_ne!(calculator.squared_risk_femtos(), risk_before);
    assert_eq!(
        calculator.squared_risk_femtos(),
        oracle_squared_risk_femtos(&solution)
    );

    calculator.before_entity_removed(&solution, index);
    solution.remove_allocation(index);
    calculator.after_entity_removed(&solution, index);

    assert_eq!(calculator.squared_risk_femtos(), risk_before);
    assert_eq!(calculator.calculate_score(), score_before);
}

#[test]
fn test_reset_is_idempotent() {
    let solution = three_class_solution();
    let mut calculator = PortfolioScoreCalculator::new();

    calculator.reset_working_solution(&solution);
    let first_risk = calculator.squared_risk_femtos();
    let first_score = calculator.calculate_score();

    calculator.reset_working_solution(&solution);
    assert_eq!(calculator.squared_risk_femtos(), first_risk);
    assert_eq!(calculator.calculate_score(), first_score);
}

#[test]
fn test_hard_score_tracks_ceiling_excess() {
    // Ceiling above the initial risk sum: feasible at first.
    let mut solution = three_class_solution_with_ceiling(9_000_000_000);
    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);
    assert_eq!(calculator.calculate_score().hard(), 0);

    // Push the risk over the ceiling.
    calculator.before_variable_changed(&solution, 1);
    solution.set_quantity_millis(1, Some(2500));
    calculator.after_variable_changed(&solution, 1);
    assert_eq!(
        calculator.calculate_score().hard(),
        -(11_150_000_000 - 9_000_000_000)
    );
    assert_eq!(calculator.calculate_score(), oracle_score(&solution));

    // And back under it.
    calculator.before_variable_changed(&solution, 1);
    solution.set_quantity_millis(1, Some(2000));
    calculator.after_variable_changed(&solution, 1);
    assert_eq!(calculator.calculate_score().hard(), 0);
    assert_eq!(calculator.calculate_score(), oracle_score(&solution));
}

#[test]
fn test_soft_score_sums_returns_only() {
    let mut solution = three_class_solution();
    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);
    // 1000*40 + 2000*60 + 1500*50
    assert_eq!(calculator.calculate_score().soft(), 235_000);

    // An unassigned allocation contributes nothing, to either level.
    let risk_before = calculator.squared_risk_femtos();
    let index = solution.add_allocation(AssetAllocation::new(1)).unwrap();
    calculator.after_entity_added(&solution, index);
    assert_eq!(calculator.calculate_score().soft(), 235_000);
    assert_eq!(calculator.squared_risk_femtos(), risk_before);

    // Assigning it adds exactly its own return.
    calculator.before_variable_changed(&solution, index);
    solution.set_quantity_millis(index, Some(100));
    calculator.after_variable_changed(&solution, index);
    assert_eq!(calculator.calculate_score().soft(), 235_000 + 100 * 60);

    // Unassigning takes it back out.
    calculator.before_variable_changed(&solution, index);
    solution.set_quantity_millis(index, None);
    calculator.after_variable_changed(&solution, index);
    assert_eq!(calculator.calculate_score().soft(), 235_000);
}

#[test]
fn test_asymmetric_correlations_follow_lookup_direction() {
    let classes = vec![
        AssetClass::new(0, "Equities", 60, 1),
        AssetClass::new(1, "Bonds", 20, 1),
    ];
    let correlations = CorrelationMatrix::builder(2)
        .set(0, 1, 400)
        .set(1, 0, -100)
        .build()
        .unwrap();
    let mut solution =
        PortfolioSolution::new(classes, correlations, Parametrization::new(0)).unwrap();
    solution
        .add_allocation(AssetAllocation::assigned(0, 1000))
        .unwrap();
    solution
        .add_allocation(AssetAllocation::assigned(1, 2000))
        .unwrap();

    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);
    // selfs 1.0e9 + 4.0e9, crosses 2e6 * 400 + 2e6 * (-100)
    assert_eq!(calculator.squared_risk_femtos(), 5_600_000_000);
    assert_eq!(
        calculator.squared_risk_femtos(),
        oracle_squared_risk_femtos(&solution)
    );

    // A retract/insert pair over one allocation touches both directions of
    // every cross pair and must land back on the same total.
    calculator.before_variable_changed(&solution, 0);
    calculator.after_variable_changed(&solution, 0);
    assert_eq!(calculator.squared_risk_femtos(), 5_600_000_000);
}

#[test]
fn test_randomized_edits_match_oracle() {
    let mut rng = StdRng::seed_from_u64(20_240_806);

    let class_count = 4;
    let classes = (0..class_count)
        .map(|i| {
            AssetClass::new(
                i as i64,
                format!("Class {i}"),
                rng.random_range(10..=100),
                rng.random_range(1..=5),
            )
        })
        .collect();
    let mut builder = CorrelationMatrix::builder(class_count);
    for a in 0..class_count {
        for b in 0..class_count {
            if a != b {
                builder = builder.set(a, b, rng.random_range(-500..=500));
            }
        }
    }
    let mut solution = PortfolioSolution::new(
        classes,
        builder.build().unwrap(),
        Parametrization::new(2_000_000_000_000),
    )
    .unwrap();
    for _ in 0..5 {
        solution
            .add_allocation(AssetAllocation::assigned(
                rng.random_range(0..class_count),
                rng.random_range(0..=3000),
            ))
            .unwrap();
    }

    let mut calculator = PortfolioScoreCalculator::new();
    calculator.reset_working_solution(&solution);

    for _ in 0..300 {
        match rng.random_range(0..10) {
            // Quantity change, the common move.
            0..=5 => {
                let index = rng.random_range(0..solution.allocations().len());
                let quantity = if rng.random_range(0..10) == 0 {
                    None
                } else {
                    Some(rng.random_range(0..=3000))
                };
                calculator.before_variable_changed(&solution, index);
                solution.set_quantity_millis(index, quantity);
                calculator.after_variable_changed(&solution, index);
            }
            // Grow the portfolio.
            6 | 7 => {
                let allocation = AssetAllocation::assigned(
                    rng.random_range(0..class_count),
                    rng.random_range(0..=3000),
                );
                calculator.before_entity_added(&solution, solution.allocations().len());
                let index = solution.add_allocation(allocation).unwrap();
                calculator.after_entity_added(&solution, index);
            }
            // Shrink it, but never to empty.
            _ => {
                if solution.allocations().len() > 1 {
                    let index = rng.random_range(0..solution.allocations().len());
                    calculator.before_entity_removed(&solution, index);
                    solution.remove_allocation(index);
                    calculator.after_entity_removed(&solution, index);
                }
            }
        }

        assert_eq!(
            calculator.squared_risk_femtos(),
            oracle_squared_risk_femtos(&solution)
        );
        assert_eq!(calculator.calculate_score(), oracle_score(&solution));
    }
}

#[test]
#[should_panic(expected = "before the first reset")]
fn test_score_query_before_reset_panics() {
    let calculator = PortfolioScoreCalculator::new();
    let _ = calculator.calculate_score();
}
