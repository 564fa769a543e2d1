//! Objective evaluation.
//!
//! | Term | Definition |
//! |------|-----------|
//! | Imbalance | Population variance of team averages (empty team = 0.0) |
//! | Exclusion penalty | `EXCLUSION_PENALTY` per co-located excluded pair |
//! | Overflow penalty | `OVERFLOW_PENALTY` per individual beyond capacity |
//!
//! Excluded pairs inside one cluster are not counted: no placement can fix
//! them, so they would only shift every candidate by the same constant.

use crate::graph::ConstraintGraph;
use crate::models::{Objective, Partition};

/// Penalty per excluded pair sharing a team.
pub const EXCLUSION_PENALTY: f64 = 1000.0;
/// Penalty per individual beyond a team's capacity.
pub const OVERFLOW_PENALTY: f64 = 100.0;

/// Population variance of team averages.
pub fn imbalance(partition: &Partition) -> f64 {
    let averages = partition.averages();
    if averages.is_empty() {
        return 0.0;
    }
    let k = averages.len() as f64;
    let mean = averages.iter().sum::<f64>() / k;
    averages.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / k
}

/// Excluded pairs (across distinct clusters) that currently share a team.
pub fn colocated_exclusions(partition: &Partition, graph: &ConstraintGraph) -> usize {
    let mut count = 0;
    for cluster in graph.clusters() {
        let Some(team) = partition.team_of(cluster.id) else {
            continue;
        };
        for (other, pairs) in graph.conflicting_clusters(cluster.id) {
            if other > cluster.id && partition.team_of(other) == Some(team) {
                count += pairs;
            }
        }
    }
    count
}

/// Evaluates the objective of a partition.
pub fn evaluate(partition: &Partition, graph: &ConstraintGraph) -> Objective {
    let penalty = EXCLUSION_PENALTY * colocated_exclusions(partition, graph) as f64
        + OVERFLOW_PENALTY * partition.total_overflow() as f64;
    Objective::new(imbalance(partition), penalty)
}
