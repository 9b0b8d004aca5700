//! Error types for problem construction
//!
//! Only malformed problem data is recoverable. Contract violations during
//! solving (out-of-range entity indices, unpaired notifications) are caller
//! bugs and panic instead of returning these.

use thiserror::Error;

/// Main error type for markowitz problem construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkowitzError {
    /// An off-diagonal correlation entry was never provided
    #[error("missing correlation between asset classes {a} and {b}")]
    MissingCorrelation { a: usize, b: usize },

    /// Correlation matrix size does not match the asset class count
    #[error("correlation matrix covers {matrix} asset classes but the solution defines {classes}")]
    ClassCountMismatch { classes: usize, matrix: usize },

    /// An allocation references an asset class ordinal that does not exist
    #[error("asset class ordinal {index} out of range for {count} asset classes")]
    UnknownAssetClass { index: usize, count: usize },
}

/// Result type alias for markowitz operations
pub type Result<T> = std::result::Result<T, MarkowitzError>;
