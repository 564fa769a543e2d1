//! Cluster model.
//!
//! A cluster is a maximal set of eligible individuals transitively linked
//! by must-with declarations. Clusters are the unit of placement: they are
//! never split across teams.

use serde::{Deserialize, Serialize};

/// A must-with connected component of the eligible pool.
///
/// Members are indices into the eligible pool (see
/// [`ConstraintGraph::members`](crate::graph::ConstraintGraph::members)),
/// kept in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier (dense, 0-based).
    pub id: usize,
    /// Pool indices of the members (ascending).
    pub members: Vec<usize>,
    /// Sum of member skills.
    pub skill_sum: f64,
}

impl Cluster {
    /// Creates a cluster.
    pub fn new(id: usize, members: Vec<usize>, skill_sum: f64) -> Self {
        Self {
            id,
            members,
            skill_sum,
        }
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Average member skill (0.0 for an empty cluster).
    pub fn average(&self) -> f64 {
        if self.members.is_empty() {
            0.0
        } else {
            self.skill_sum / self.members.len() as f64
        }
    }

    /// Whether this cluster has a single member.
    #[inline]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}
