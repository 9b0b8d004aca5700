//! HardSoftScore - Two-level score with hard and soft components

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use super::traits::Score;

/// A score with separate hard and soft levels.
///
/// The hard level is a feasibility penalty: it is zero when the portfolio
/// satisfies every hard constraint and negative otherwise. The soft level is
/// the quality value to be maximized.
///
/// When comparing scores:
/// 1. Hard levels are compared first
/// 2. Soft levels are only compared when hard levels are equal
///
/// # Examples
///
/// ```
/// use markowitz_core::HardSoftScore;
///
/// let score1 = HardSoftScore::of(-1, 500);  // infeasible
/// let score2 = HardSoftScore::of(0, 200);   // feasible but lower quality
///
/// // Feasible solutions are always better than infeasible ones
/// assert!(score2 > score1);
///
/// let score3 = HardSoftScore::of(0, 350);
/// assert!(score3 > score2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HardSoftScore {
    hard: i64,
    soft: i64,
}

impl HardSoftScore {
    /// The zero score.
    pub const ZERO: HardSoftScore = HardSoftScore { hard: 0, soft: 0 };

    /// Creates a new HardSoftScore.
    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        HardSoftScore { hard, soft }
    }

    /// Creates a score with only a hard component.
    #[inline]
    pub const fn of_hard(hard: i64) -> Self {
        HardSoftScore { hard, soft: 0 }
    }

    /// Creates a score with only a soft component.
    #[inline]
    pub const fn of_soft(soft: i64) -> Self {
        HardSoftScore { hard: 0, soft }
    }

    /// Returns the hard level.
    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    /// Returns the soft level.
    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }
}

impl Score for HardSoftScore {
    #[inline]
    fn is_feasible(&self) -> bool {
        self.hard >= 0
    }

    #[inline]
    fn zero() -> Self {
        HardSoftScore::ZERO
    }
}

impl Ord for HardSoftScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => self.soft.cmp(&other.soft),
            other => other,
        }
    }
}

impl PartialOrd for HardSoftScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for HardSoftScore {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        HardSoftScore::of(self.hard + other.hard, self.soft + other.soft)
    }
}

impl Sub for HardSoftScore {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        HardSoftScore::of(self.hard - other.hard, self.soft - other.soft)
    }
}

impl Neg for HardSoftScore {
    type Output = Self;

    fn neg(self) -> Self {
        HardSoftScore::of(-self.hard, -self.soft)
    }
}

impl fmt::Debug for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HardSoftScore({}, {})", self.hard, self.soft)
    }
}

impl fmt::Display for HardSoftScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}
