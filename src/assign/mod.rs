//! Initial cluster-to-team assignment.
//!
//! `GreedyAssigner` places heavy clusters first, each into the team whose
//! resulting total stays closest to the per-person target. It is not
//! optimal; it produces a valid (or diagnosed) starting point for local
//! search.
//!
//! `FeasibilitySearch` is the fallback when greedy placement leaves an
//! exclusion violated or a team overfilled: a bounded depth-first search
//! for any assignment that honors every constraint.
//!
//! # Reference
//! Graham (1969), "Bounds on Multiprocessing Timing Anomalies" (LPT rule)

mod exact;
mod greedy;

pub use exact::FeasibilitySearch;
pub use greedy::GreedyAssigner;
