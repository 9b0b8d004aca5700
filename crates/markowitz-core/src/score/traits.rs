//! Core Score trait definition

use std::fmt::{Debug, Display};
use std::ops::{Add, Neg, Sub};

/// Core trait for score types.
///
/// Scores represent the quality of a working solution. They are used to:
/// - Compare solutions (better/worse/equal)
/// - Determine feasibility
///
/// All score implementations must be:
/// - Immutable (operations return new instances)
/// - Thread-safe (Send + Sync)
/// - Comparable (total ordering, higher is better)
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + 'static
{
    /// Returns true if this score represents a feasible solution.
    ///
    /// A solution is feasible when all hard constraints are satisfied
    /// (i.e., the hard level is >= 0).
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;
}
