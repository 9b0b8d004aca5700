//! Asset classes and allocation entities
//!
//! All figures are fixed-point signed integers: per-class return and risk at
//! milli resolution, quantified (quantity-weighted) values at micro
//! resolution. Floating point is never used, so incremental and from-scratch
//! score computations agree bit-for-bit.

/// A static asset category.
///
/// Asset classes are problem facts: they never change while a solution is
/// being solved. The pairwise correlation coefficients live in the
/// solution's [`CorrelationMatrix`](super::CorrelationMatrix), indexed by
/// the class ordinal (its position in the solution's class list).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetClass {
    pub id: i64,
    pub name: String,
    /// Expected return per unit of quantity, in millis (1000 = 100%).
    pub expected_return_millis: i64,
    /// Standard deviation risk per unit of quantity, in millis.
    pub standard_deviation_risk_millis: i64,
}

impl AssetClass {
    /// Creates a new asset class.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        expected_return_millis: i64,
        standard_deviation_risk_millis: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            expected_return_millis,
            standard_deviation_risk_millis,
        }
    }
}

/// One decision variable: a quantity allocated to an asset class.
///
/// The class ordinal is fixed for the lifetime of the allocation; only
/// `quantity_millis` changes during solving. `None` means the construction
/// phase has not assigned a quantity yet; every derived value is zero until
/// it does.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetAllocation {
    /// Ordinal of the asset class in the solution's class list.
    pub asset_class: usize,
    /// The planning variable: allocated quantity in millis.
    pub quantity_millis: Option<i64>,
}

impl AssetAllocation {
    /// Creates an allocation with no quantity assigned.
    pub fn new(asset_class: usize) -> Self {
        Self {
            asset_class,
            quantity_millis: None,
        }
    }

    /// Creates an allocation with an assigned quantity.
    pub fn assigned(asset_class: usize, quantity_millis: i64) -> Self {
        Self {
            asset_class,
            quantity_millis: Some(quantity_millis),
        }
    }

    /// Quantity-weighted risk in micros (milli quantity x milli risk).
    #[inline]
    pub fn quantified_risk_micros(&self, class: &AssetClass) -> i64 {
        self.quantity_millis
            .map_or(0, |quantity| quantity * class.standard_deviation_risk_millis)
    }

    /// Quantity-weighted expected return in micros (milli quantity x milli return).
    #[inline]
    pub fn quantified_return_micros(&self, class: &AssetClass) -> i64 {
        self.quantity_millis
            .map_or(0, |quantity| quantity * class.expected_return_millis)
    }
}
