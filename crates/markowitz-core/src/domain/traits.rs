//! Core domain traits

use crate::score::Score;

/// Marker trait for working solutions.
///
/// A working solution represents both the problem definition and the
/// (potentially partial) solution. It contains:
/// - Problem facts: Immutable input data
/// - Planning entities: Things to be optimized
/// - Score: The quality of the current solution
///
/// # Thread Safety
///
/// Working solutions must be `Send + Sync` so that independent search
/// threads can each own a private clone.
pub trait PlanningSolution: Clone + Send + Sync + 'static {
    /// The score type used to evaluate this solution.
    type Score: Score;

    /// Returns the current score of this solution, if calculated.
    ///
    /// Returns `None` if the solution has not been scored yet.
    fn score(&self) -> Option<Self::Score>;

    /// Sets the score of this solution.
    fn set_score(&mut self, score: Option<Self::Score>);
}
