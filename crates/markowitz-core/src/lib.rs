//! Markowitz Core - score types and domain model for portfolio allocation
//!
//! This crate provides the fundamental types for the markowitz solver:
//! - Score types for representing allocation quality
//! - The portfolio domain model (asset classes, allocations, correlations)
//! - Error types for problem construction

pub mod domain;
pub mod error;
pub mod score;

pub use domain::{
    AssetAllocation, AssetClass, CorrelationMatrix, CorrelationMatrixBuilder, Parametrization,
    PlanningSolution, PortfolioSolution,
};
pub use error::{MarkowitzError, Result};
pub use score::{HardSoftScore, Score};
