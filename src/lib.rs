//! Balanced team partitioning for the U-Engine ecosystem.
//!
//! Splits a roster of rated individuals into a fixed number of teams that
//! are as equal as possible in size and average skill, while honoring
//! must-play-with clusters and hard must-not-play-with exclusions.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Individual`, `Cluster`, `Team`,
//!   `Partition`, `PartitionResult`, `Diagnostic`, `Objective`
//! - **`validation`**: Roster integrity checks (empty/duplicate IDs, non-finite skill)
//! - **`graph`**: Reference resolution and must-with clustering (union-find)
//! - **`planner`**: Per-team target sizes
//! - **`assign`**: Heavy-first greedy placement with a defined failure policy,
//!   plus a bounded feasibility search as fallback
//! - **`search`**: Objective scoring and hill-climbing refinement
//! - **`partitioner`**: Multi-trial orchestration (`compute_partition`)
//! - **`kpi`**: Balance metrics for display
//!
//! # Example
//!
//! ```
//! use u_teams::{PartitionConfig, compute_partition};
//! use u_teams::models::Individual;
//!
//! let roster = vec![
//!     Individual::new("1", 4.5).with_name("Ana").with_must_with("Ben"),
//!     Individual::new("2", 3.0).with_name("Ben"),
//!     Individual::new("3", 4.0).with_name("Cleo").with_must_not_with("1"),
//!     Individual::new("4", 2.5).with_name("Dov"),
//! ];
//!
//! let result = compute_partition(&roster, 2, &PartitionConfig::default().with_seed(1)).unwrap();
//! assert!(result.is_valid());
//! assert!(result.same_team("1", "2"));
//! assert!(!result.same_team("1", "3"));
//! ```
//!
//! # Errors
//!
//! Only configuration problems are errors ([`PartitionError`]). Infeasible
//! constraints produce a best-effort partition with diagnostics attached.
//!
//! # References
//!
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"
//! - Tarjan (1975), "Efficiency of a Good But Not Linear Set Union Algorithm"
//! - Aarts & Lenstra (2003), "Local Search in Combinatorial Optimization"

pub mod assign;
pub mod error;
pub mod graph;
pub mod kpi;
pub mod models;
pub mod partitioner;
pub mod planner;
pub mod search;
pub mod validation;

pub use error::PartitionError;
pub use partitioner::{PartitionConfig, Partitioner, compute_partition};
