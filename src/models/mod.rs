//! Team partitioning domain models.
//!
//! Provides the data types flowing through the engine, from the
//! caller-supplied roster to the returned result.
//!
//! # Data Flow
//!
//! | Stage | Type |
//! |-------|------|
//! | Input | `Individual` |
//! | Clustering | `Cluster` |
//! | Assignment / search | `Partition`, `Bin`, `Objective` |
//! | Output | `PartitionResult`, `Team`, `Member`, `Diagnostic` |

mod cluster;
mod diagnostic;
mod individual;
mod objective;
mod partition;
mod result;
mod team;

pub use cluster::Cluster;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use individual::Individual;
pub use objective::{IMPROVEMENT_EPSILON, Objective};
pub use partition::{Bin, Partition};
pub use result::PartitionResult;
pub use team::{Member, Team};
