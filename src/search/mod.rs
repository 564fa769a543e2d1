//! Objective scoring and local-search refinement.
//!
//! # Submodules
//!
//! - [`objective`]: imbalance and penalty terms
//! - `local`: hill-climbing over cluster moves, swaps and exchanges
//!
//! # Reference
//! Aarts & Lenstra (2003), "Local Search in Combinatorial Optimization", Ch. 1

mod local;
pub mod objective;

pub use local::{LocalSearchOptimizer, SearchStats};
pub use objective::{EXCLUSION_PENALTY, OVERFLOW_PENALTY, evaluate};
