//! Incremental score maintenance for the markowitz portfolio solver.
//!
//! This crate keeps a two-level score (feasibility penalty plus quality
//! value) up to date while an external solving engine edits the working
//! solution. The engine brackets every edit with before/after notification
//! hooks; the calculator updates only the quadratic risk terms touched by
//! the edited allocation, an O(n) operation, instead of recomputing the full
//! O(n²) risk sum.
//!
//! # Architecture
//!
//! All arithmetic is fixed-point `i64`; incremental updates are bit-exact
//! against a from-scratch recomputation. One calculator instance is bound to
//! one solving session and one thread - parallel searches each own a private
//! calculator over a private solution clone.

pub mod calculator;
pub mod portfolio;

#[cfg(test)]
mod portfolio_tests;

pub use calculator::IncrementalScoreCalculator;
pub use portfolio::PortfolioScoreCalculator;
