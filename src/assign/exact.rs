//! Bounded exhaustive search for a feasible assignment.
//!
//! # Algorithm
//!
//! Depth-first search over clusters (largest, then most-constrained
//! first). Each cluster tries the teams in index order that have room and
//! hold no excluded partner. Empty teams of equal capacity are
//! interchangeable, so only the first of them is tried. Backtracking is
//! iterative; the search gives up after `node_limit` candidate checks.
//!
//! Balance is ignored here: the result is a feasible start for local
//! search, not a final answer.
//!
//! # Reference
//! Baptiste, Le Pape & Nuijten (2001), "Constraint-Based Scheduling"

use std::cmp::Reverse;

use tracing::debug;

use crate::graph::ConstraintGraph;
use crate::models::Partition;

/// Exhaustive feasibility search with a work budget.
///
/// # Example
///
/// ```
/// use u_teams::assign::FeasibilitySearch;
/// use u_teams::graph::ConstraintGraph;
/// use u_teams::models::Individual;
///
/// let roster = vec![
///     Individual::new("a", 5.0).with_must_not_with("b"),
///     Individual::new("b", 5.0),
///     Individual::new("c", 5.0),
///     Individual::new("d", 5.0),
/// ];
/// let graph = ConstraintGraph::build(&roster);
/// let partition = FeasibilitySearch::new().find(&graph, &[2, 2]).unwrap();
/// assert_ne!(partition.team_of(0), partition.team_of(1));
/// ```
#[derive(Debug, Clone)]
pub struct FeasibilitySearch {
    node_limit: usize,
}

impl FeasibilitySearch {
    /// Creates a search with a budget of 250 000 candidate checks.
    pub fn new() -> Self {
        Self {
            node_limit: 250_000,
        }
    }

    /// Sets the number of candidate checks before giving up.
    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// A complete partition with no overflow and no co-located exclusion,
    /// or `None` if none exists or the budget ran out first.
    pub fn find(&self, graph: &ConstraintGraph, capacities: &[usize]) -> Option<Partition> {
        let team_count = capacities.len();
        let mut partition = Partition::new(capacities, graph.clusters().len());
        if team_count == 0 {
            return graph.clusters().is_empty().then_some(partition);
        }

        let mut order: Vec<usize> = (0..graph.clusters().len()).collect();
        order.sort_by_key(|&c| {
            Reverse((graph.cluster(c).size(), graph.conflicting_clusters(c).count()))
        });

        // next[d]: first team not yet tried for the cluster at depth d
        let mut next = vec![0usize; order.len()];
        let mut depth = 0usize;
        let mut nodes = 0usize;
        while depth < order.len() {
            let cluster = graph.cluster(order[depth]);
            let mut placed = false;
            while next[depth] < team_count {
                let team = next[depth];
                next[depth] += 1;
                nodes += 1;
                if nodes > self.node_limit {
                    debug!(nodes, depth, "feasibility search budget exhausted");
                    return None;
                }
                let bin = &partition.bins[team];
                let interchangeable = bin.size == 0
                    && partition.bins[..team]
                        .iter()
                        .any(|b| b.size == 0 && b.capacity == bin.capacity);
                if bin.remaining() >= cluster.size()
                    && !interchangeable
                    && !graph.has_conflict(cluster.id, &bin.clusters, None)
                {
                    partition.assign(cluster, team);
                    placed = true;
                    break;
                }
            }

            if placed {
                depth += 1;
                if depth < order.len() {
                    next[depth] = 0;
                }
            } else {
                if depth == 0 {
                    debug!(nodes, "no feasible assignment exists");
                    return None;
                }
                depth -= 1;
                partition.unassign(graph.cluster(order[depth]));
            }
        }

        debug!(nodes, "feasible assignment found");
        Some(partition)
    }
}

impl Default for FeasibilitySearch {
    fn default() -> Self {
        Self::new()
    }
}
