//! Dense pairwise correlation table
//!
//! Correlation lookup sits in the innermost loop of score maintenance, so
//! the table is a flat row-major `Vec<i64>` indexed by class ordinal rather
//! than a map keyed by class identity. Self-correlation is implicit: a class
//! is fully correlated with itself, so the diagonal is never stored and
//! lookups on it yield the fixed-point unit.

use crate::error::{MarkowitzError, Result};

/// A class is fully correlated with itself: 1000 millis = 1.0.
const SELF_CORRELATION_MILLIS: i64 = 1000;

/// Pairwise correlation coefficients between asset classes, in millis.
///
/// Lookup is directional: `millis(a, b)` and `millis(b, a)` are stored
/// independently, matching the two directional terms of the risk delta.
///
/// # Examples
///
/// ```
/// use markowitz_core::CorrelationMatrix;
///
/// let correlations = CorrelationMatrix::builder(3)
///     .set_symmetric(0, 1, 300)
///     .set_symmetric(0, 2, -200)
///     .set_symmetric(1, 2, 100)
///     .build()
///     .unwrap();
/// assert_eq!(correlations.millis(0, 1), 300);
/// assert_eq!(correlations.millis(2, 0), -200);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationMatrix {
    size: usize,
    millis: Vec<i64>,
}

impl CorrelationMatrix {
    /// Starts building a matrix covering `size` asset classes.
    pub fn builder(size: usize) -> CorrelationMatrixBuilder {
        CorrelationMatrixBuilder {
            size,
            millis: vec![None; size * size],
        }
    }

    /// Number of asset classes this matrix covers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The correlation coefficient from class `a` to class `b`, in millis.
    ///
    /// `millis(a, a)` is the implicit diagonal, 1000, without a table entry.
    ///
    /// # Panics
    ///
    /// Panics if an ordinal is out of range.
    #[inline]
    pub fn millis(&self, a: usize, b: usize) -> i64 {
        if a == b {
            SELF_CORRELATION_MILLIS
        } else {
            self.millis[a * self.size + b]
        }
    }
}

/// Builder for [`CorrelationMatrix`].
///
/// Every off-diagonal entry must be provided before [`build`] succeeds;
/// a hole in the table would otherwise surface mid-solve as a wrong score.
///
/// [`build`]: CorrelationMatrixBuilder::build
#[derive(Clone, Debug)]
pub struct CorrelationMatrixBuilder {
    size: usize,
    millis: Vec<Option<i64>>,
}

impl CorrelationMatrixBuilder {
    /// Sets the directional coefficient from class `a` to class `b`.
    ///
    /// # Panics
    ///
    /// Panics if an ordinal is out of range or `a == b`.
    pub fn set(mut self, a: usize, b: usize, millis: i64) -> Self {
        assert!(
            a < self.size && b < self.size,
            "class ordinal out of range: ({a}, {b}) for size {}",
            self.size
        );
        assert_ne!(a, b, "self-correlation is implicit, never stored");
        self.millis[a * self.size + b] = Some(millis);
        self
    }

    /// Sets the coefficient in both directions at once.
    pub fn set_symmetric(self, a: usize, b: usize, millis: i64) -> Self {
        self.set(a, b, millis).set(b, a, millis)
    }

    /// Finalizes the matrix.
    ///
    /// Returns [`MarkowitzError::MissingCorrelation`] for the first
    /// off-diagonal entry that was never set.
    pub fn build(self) -> Result<CorrelationMatrix> {
        let mut millis = Vec::with_capacity(self.size * self.size);
        for a in 0..self.size {
            for b in 0..self.size {
                match self.millis[a * self.size + b] {
                    Some(value) => millis.push(value),
                    // Diagonal entries are never read; store zero.
                    None if a == b => millis.push(0),
                    None => return Err(MarkowitzError::MissingCorrelation { a, b }),
                }
            }
        }
        Ok(CorrelationMatrix {
            size: self.size,
            millis,
        })
    }
}
