//! Portfolio domain model
//!
//! The solution model owned by the calling engine:
//! - `AssetClass`: static category with per-class return and risk figures
//! - `CorrelationMatrix`: dense pairwise correlation table, ordinal-indexed
//! - `AssetAllocation`: one decision variable (quantity assigned to a class)
//! - `Parametrization`: global configuration (the squared-risk ceiling)
//! - `PortfolioSolution`: the complete working solution

mod asset;
mod correlation;
mod solution;
mod traits;


pub use asset::{AssetAllocation, AssetClass};
pub use correlation::{CorrelationMatrix, CorrelationMatrixBuilder};
pub use solution::{Parametrization, PortfolioSolution};
pub use traits::PlanningSolution;
