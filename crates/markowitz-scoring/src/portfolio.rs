//! Incremental maintenance of the portfolio score.
//!
//! The portfolio objective has two levels. Hard: the quadratic risk sum -
//! every ordered pair of allocations contributes its correlated variance -
//! must stay under the parametrized ceiling; the excess becomes a negative
//! feasibility penalty. Soft: the sum of every allocation's quantified
//! expected return, to be maximized.
//!
//! The quadratic term is the expensive part. Re-evaluating it after every
//! variable change would cost O(n²); this calculator instead adds or
//! removes only the pair terms touched by the edited allocation, an O(n)
//! walk, while staying bit-exact against a full recomputation.

use markowitz_core::{HardSoftScore, PortfolioSolution};
use tracing::debug;

use crate::calculator::IncrementalScoreCalculator;

/// Incremental score calculator for [`PortfolioSolution`].
///
/// Owns the running totals for one solving session. Instantiate one
/// calculator per session (and per search thread - instances never share
/// state), reset it against the working solution, then feed it the
/// notification stream of the engine's edits.
///
/// # Examples
///
/// ```
/// use markowitz_core::{
///     AssetAllocation, AssetClass, CorrelationMatrix, Parametrization, PortfolioSolution,
/// };
/// use markowitz_scoring::{IncrementalScoreCalculator, PortfolioScoreCalculator};
///
/// let classes = vec![
///     AssetClass::new(0, "Equities", 60, 1),
///     AssetClass::new(1, "Bonds", 20, 1),
/// ];
/// let correlations = CorrelationMatrix::builder(2).set_symmetric(0, 1, 150).build()?;
/// let parametrization = Parametrization::new(10_000_000_000);
/// let mut solution = PortfolioSolution::new(classes, correlations, parametrization)?;
/// solution.add_allocation(AssetAllocation::assigned(0, 600))?;
/// solution.add_allocation(AssetAllocation::assigned(1, 400))?;
///
/// let mut calculator = PortfolioScoreCalculator::new();
/// calculator.reset_working_solution(&solution);
/// let initial = calculator.calculate_score();
/// assert!(initial.hard() == 0);
///
/// // One move: reallocate quantity, bracketed by the notification pair.
/// calculator.before_variable_changed(&solution, 0);
/// solution.set_quantity_millis(0, Some(500));
/// calculator.after_variable_changed(&solution, 0);
/// assert_ne!(calculator.calculate_score(), initial);
/// # Ok::<(), markowitz_core::MarkowitzError>(())
/// ```
#[derive(Debug, Default)]
pub struct PortfolioScoreCalculator {
    squared_risk_femtos_maximum: i64,
    squared_risk_femtos: i64,
    hard_score: i64,
    soft_score: i64,
    initialized: bool,
}

impl PortfolioScoreCalculator {
    /// Creates a calculator awaiting its first reset.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `reset_working_solution` has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The running quadratic risk sum, in femtos.
    #[inline]
    pub fn squared_risk_femtos(&self) -> i64 {
        self.squared_risk_femtos
    }

    /// The risk ceiling captured at the last reset, in femtos.
    #[inline]
    pub fn squared_risk_femtos_maximum(&self) -> i64 {
        self.squared_risk_femtos_maximum
    }

    fn insert(&mut self, solution: &PortfolioSolution, index: usize, initial_build: bool) {
        if self.squared_risk_femtos > self.squared_risk_femtos_maximum {
            self.hard_score += self.squared_risk_femtos - self.squared_risk_femtos_maximum;
        }
        self.squared_risk_femtos += squared_risk_femtos_delta(solution, index, initial_build);
        if self.squared_risk_femtos > self.squared_risk_femtos_maximum {
            self.hard_score -= self.squared_risk_femtos - self.squared_risk_femtos_maximum;
        }
        let allocation = &solution.allocations()[index];
        self.soft_score += allocation.quantified_return_micros(solution.asset_class_of(allocation));
    }

    fn retract(&mut self, solution: &PortfolioSolution, index: usize) {
        if self.squared_risk_femtos > self.squared_risk_femtos_maximum {
            self.hard_score += self.squared_risk_femtos - self.squared_risk_femtos_maximum;
        }
        self.squared_risk_femtos -= squared_risk_femtos_delta(solution, index, false);
        if self.squared_risk_femtos > self.squared_risk_femtos_maximum {
            self.hard_score -= self.squared_risk_femtos - self.squared_risk_femtos_maximum;
        }
        let allocation = &solution.allocations()[index];
        self.soft_score -= allocation.quantified_return_micros(solution.asset_class_of(allocation));
    }
}

/// Pairwise risk contribution of the allocation at `index` against every
/// present allocation, in femtos.
fn squared_risk_femtos_delta(
    solution: &PortfolioSolution,
    index: usize,
    initial_build: bool,
) -> i64 {
    let allocations = solution.allocations();
    let correlations = solution.correlations();
    let allocation = &allocations[index];
    let risk_micros = allocation.quantified_risk_micros(solution.asset_class_of(allocation));

    let mut delta_femtos = 0i64;
    for (other_index, other) in allocations.iter().enumerate() {
        if other_index == index {
            // Self pair: micro x micro = pico, carried at femto resolution.
            delta_femtos += risk_micros * risk_micros * 1000;
        } else {
            let other_risk_micros = other.quantified_risk_micros(solution.asset_class_of(other));
            let picos = risk_micros * other_risk_micros;
            delta_femtos += picos * correlations.millis(allocation.asset_class, other.asset_class);
            // A rebuild visits every allocation, so each cross pair is
            // reached once from each side and one direction per visit
            // suffices. An isolated insert or retract must add both
            // directions itself. The split is only sound while no move
            // issues overlapping before/after pairs for several
            // allocations without fully resolving in between.
            if !initial_build {
                delta_femtos +=
                    picos * correlations.millis(other.asset_class, allocation.asset_class);
            }
        }
    }
    delta_femtos
}

impl IncrementalScoreCalculator<PortfolioSolution> for PortfolioScoreCalculator {
    fn reset_working_solution(&mut self, solution: &PortfolioSolution) {
        self.squared_risk_femtos_maximum =
            solution.parametrization().squared_risk_femtos_maximum();
        self.squared_risk_femtos = 0;
        self.hard_score = 0;
        self.soft_score = 0;
        self.initialized = true;
        for index in 0..solution.allocations().len() {
            self.insert(solution, index, true);
        }
        debug!(
            allocations = solution.allocations().len(),
            squared_risk_femtos = self.squared_risk_femtos,
            squared_risk_femtos_maximum = self.squared_risk_femtos_maximum,
            "working solution reset"
        );
    }

    fn after_entity_added(&mut self, solution: &PortfolioSolution, index: usize) {
        debug_assert!(self.initialized, "notification before the first reset");
        self.insert(solution, index, false);
    }

    fn before_variable_changed(&mut self, solution: &PortfolioSolution, index: usize) {
        debug_assert!(self.initialized, "notification before the first reset");
        self.retract(solution, index);
    }

    fn after_variable_changed(&mut self, solution: &PortfolioSolution, index: usize) {
        debug_assert!(self.initialized, "notification before the first reset");
        self.insert(solution, index, false);
    }

    fn before_entity_removed(&mut self, solution: &PortfolioSolution, index: usize) {
        debug_assert!(self.initialized, "notification before the first reset");
        self.retract(solution, index);
    }

    fn calculate_score(&self) -> HardSoftScore {
        debug_assert!(self.initialized, "score queried before the first reset");
        HardSoftScore::of(self.hard_score, self.soft_score)
    }
}
