//! The portfolio working solution and its global parametrization

use crate::error::{MarkowitzError, Result};
use crate::score::HardSoftScore;

use super::asset::{AssetAllocation, AssetClass};
use super::correlation::CorrelationMatrix;
use super::traits::PlanningSolution;

/// Global problem configuration.
///
/// Holds the squared-risk ceiling: the maximum tolerated value of the
/// portfolio's quadratic risk sum, at femto resolution. Risk above the
/// ceiling becomes a hard penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parametrization {
    squared_risk_femtos_maximum: i64,
}

impl Parametrization {
    /// Creates a parametrization from a squared-risk ceiling in femtos.
    pub const fn new(squared_risk_femtos_maximum: i64) -> Self {
        Self {
            squared_risk_femtos_maximum,
        }
    }

    /// Creates a parametrization from a standard deviation maximum in millis.
    ///
    /// Squaring two milli values yields micros; the micro ceiling is carried
    /// at femto resolution, hence the `10^9` factor.
    pub const fn from_standard_deviation_millis_maximum(millis_maximum: i64) -> Self {
        Self {
            squared_risk_femtos_maximum: millis_maximum * millis_maximum * 1_000_000_000,
        }
    }

    /// The squared-risk ceiling in femtos.
    #[inline]
    pub const fn squared_risk_femtos_maximum(&self) -> i64 {
        self.squared_risk_femtos_maximum
    }
}

/// The complete portfolio working solution.
///
/// Owns the static problem facts (asset classes, correlations,
/// parametrization) and the mutable allocation list. The calling engine
/// mutates allocations through [`set_quantity_millis`],
/// [`add_allocation`] and [`remove_allocation`], bracketing each edit with
/// the score calculator's notification hooks; allocations are addressed by
/// their index in the list, valid at call time.
///
/// [`set_quantity_millis`]: PortfolioSolution::set_quantity_millis
/// [`add_allocation`]: PortfolioSolution::add_allocation
/// [`remove_allocation`]: PortfolioSolution::remove_allocation
#[derive(Clone, Debug)]
pub struct PortfolioSolution {
    asset_classes: Vec<AssetClass>,
    correlations: CorrelationMatrix,
    parametrization: Parametrization,
    allocations: Vec<AssetAllocation>,
    score: Option<HardSoftScore>,
}

impl PortfolioSolution {
    /// Creates a solution with an empty allocation list.
    ///
    /// Returns [`MarkowitzError::ClassCountMismatch`] when the correlation
    /// matrix does not cover exactly the given asset classes.
    pub fn new(
        asset_classes: Vec<AssetClass>,
        correlations: CorrelationMatrix,
        parametrization: Parametrization,
    ) -> Result<Self> {
        if correlations.size() != asset_classes.len() {
            return Err(MarkowitzError::ClassCountMismatch {
                classes: asset_classes.len(),
                matrix: correlations.size(),
            });
        }
        Ok(Self {
            asset_classes,
            correlations,
            parametrization,
            allocations: Vec::new(),
            score: None,
        })
    }

    pub fn asset_classes(&self) -> &[AssetClass] {
        &self.asset_classes
    }

    pub fn correlations(&self) -> &CorrelationMatrix {
        &self.correlations
    }

    pub fn parametrization(&self) -> &Parametrization {
        &self.parametrization
    }

    pub fn allocations(&self) -> &[AssetAllocation] {
        &self.allocations
    }

    /// The asset class an allocation points at.
    #[inline]
    pub fn asset_class_of(&self, allocation: &AssetAllocation) -> &AssetClass {
        &self.asset_classes[allocation.asset_class]
    }

    /// Appends an allocation and returns its index.
    ///
    /// Returns [`MarkowitzError::UnknownAssetClass`] when the allocation
    /// references a class ordinal outside the solution's class list.
    pub fn add_allocation(&mut self, allocation: AssetAllocation) -> Result<usize> {
        if allocation.asset_class >= self.asset_classes.len() {
            return Err(MarkowitzError::UnknownAssetClass {
                index: allocation.asset_class,
                count: self.asset_classes.len(),
            });
        }
        self.allocations.push(allocation);
        Ok(self.allocations.len() - 1)
    }

    /// Removes and returns the allocation at `index`.
    ///
    /// Later allocations shift down by one; the engine must re-derive any
    /// indices it holds. Panics when the index is out of range.
    pub fn remove_allocation(&mut self, index: usize) -> AssetAllocation {
        self.allocations.remove(index)
    }

    /// Assigns the quantity of the allocation at `index`.
    ///
    /// Panics when the index is out of range.
    pub fn set_quantity_millis(&mut self, index: usize, quantity_millis: Option<i64>) {
        self.allocations[index].quantity_millis = quantity_millis;
    }
}

impl PlanningSolution for PortfolioSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}
