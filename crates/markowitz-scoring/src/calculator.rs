//! Incremental score calculator lifecycle contract.
//!
//! The calling engine owns the working solution and drives the calculator
//! through paired before/after notifications around every edit. The
//! calculator is typed directly over the solution; entities are addressed by
//! their index in the solution's entity list, valid at the moment of the
//! call.

use markowitz_core::PlanningSolution;

/// Lifecycle contract between a solving engine and an incremental score
/// calculator.
///
/// The engine must invoke the operations as follows:
///
/// | Call | When |
/// |---|---|
/// | `reset_working_solution` | Once, when a working solution is (re)established |
/// | `before_entity_added` / `after_entity_added` | Bracketing insertion of a new entity |
/// | `before_variable_changed` / `after_variable_changed` | Bracketing mutation of an entity's planning variable |
/// | `before_entity_removed` / `after_entity_removed` | Bracketing deletion of an entity |
/// | `calculate_score` | Whenever the engine needs the current score |
///
/// The before/after split around a variable change is load-bearing: the
/// calculator has no access to the old value once the mutation has happened,
/// so the pre-mutation contribution must be retracted strictly before the
/// edit and the post-mutation contribution inserted strictly after. For an
/// entity addition the entity must already be present in the collection when
/// `after_entity_added` runs; for a removal it must still be present when
/// `before_entity_removed` runs.
///
/// Unpaired or reordered notifications are caller bugs: the calculator is
/// entitled to fail loudly rather than continue with a desynchronized score.
pub trait IncrementalScoreCalculator<S: PlanningSolution> {
    /// Rebuilds all running totals from the full entity list.
    fn reset_working_solution(&mut self, solution: &S);

    /// Called before a new entity is inserted into the solution.
    fn before_entity_added(&mut self, _solution: &S, _index: usize) {}

    /// Called after a new entity was inserted at `index`.
    fn after_entity_added(&mut self, solution: &S, index: usize);

    /// Called before the planning variable of the entity at `index` changes.
    fn before_variable_changed(&mut self, solution: &S, index: usize);

    /// Called after the planning variable of the entity at `index` changed.
    fn after_variable_changed(&mut self, solution: &S, index: usize);

    /// Called before the entity at `index` is removed from the solution.
    fn before_entity_removed(&mut self, solution: &S, index: usize);

    /// Called after an entity was removed.
    fn after_entity_removed(&mut self, _solution: &S, _index: usize) {}

    /// Returns the current score. Pure read, valid any time after the first
    /// `reset_working_solution`.
    fn calculate_score(&self) -> S::Score;
}
