//! Hill-climbing over cluster moves, swaps and exchanges.
//!
//! # Algorithm
//!
//! Each iteration picks a random cluster and a random other team, then:
//! 1. **Move**: relocate the cluster to that team.
//! 2. **Swap**: otherwise exchange it with a random cluster of that team.
//! 3. **Exchange**: otherwise trade a multi-member cluster for a group of
//!    smaller clusters of that team with the same total size (a pair for
//!    two singletons, say). Team sizes stay unchanged.
//!
//! A candidate is legal only if no incoming cluster brings an excluded
//! partner into its new team and no team grows past its capacity (a team
//! already over capacity may shrink, never grow). A legal candidate is
//! kept only if it strictly lowers the objective; otherwise it is undone.
//! Ties are rejected.
//!
//! Stops after `stall_limit` consecutive non-improving iterations, when
//! `max_iterations` runs out, or once the deadline passes.

use std::time::Instant;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

use super::objective::evaluate;
use crate::graph::ConstraintGraph;
use crate::models::{Objective, Partition};

/// How often (in iterations) the deadline is checked.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Counters from one optimization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Iterations executed.
    pub iterations: usize,
    /// Accepted moves.
    pub moves: usize,
    /// Accepted swaps.
    pub swaps: usize,
    /// Accepted cluster-for-group exchanges.
    pub exchanges: usize,
    /// Objective before the search.
    pub initial: Objective,
    /// Objective after the search (also the best seen).
    pub best: Objective,
}

impl SearchStats {
    /// Accepted moves, swaps and exchanges.
    pub fn improvements(&self) -> usize {
        self.moves + self.swaps + self.exchanges
    }
}

/// Randomized first-improvement local search.
#[derive(Debug, Clone)]
pub struct LocalSearchOptimizer {
    max_iterations: usize,
    stall_limit: usize,
    deadline: Option<Instant>,
}

impl LocalSearchOptimizer {
    /// Creates an optimizer (1200 iterations, stall limit 400, no deadline).
    pub fn new() -> Self {
        Self {
            max_iterations: 1200,
            stall_limit: 400,
            deadline: None,
        }
    }

    /// Sets the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the consecutive non-improving iterations allowed before stopping.
    pub fn with_stall_limit(mut self, stall_limit: usize) -> Self {
        self.stall_limit = stall_limit.max(1);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Improves `partition` in place.
    pub fn optimize<R: Rng>(
        &self,
        partition: &mut Partition,
        graph: &ConstraintGraph,
        rng: &mut R,
    ) -> SearchStats {
        let initial = evaluate(partition, graph);
        let mut stats = SearchStats {
            initial,
            best: initial,
            ..SearchStats::default()
        };

        let cluster_count = graph.clusters().len();
        let team_count = partition.team_count();
        if cluster_count < 2 || team_count < 2 {
            return stats;
        }

        let mut current = initial;
        let mut stall = 0usize;
        for iteration in 0..self.max_iterations {
            if iteration % DEADLINE_CHECK_INTERVAL == 0
                && self.deadline.is_some_and(|d| Instant::now() >= d)
            {
                break;
            }
            stats.iterations += 1;

            let cluster = rng.random_range(0..cluster_count);
            let Some(from) = partition.team_of(cluster) else {
                continue;
            };
            let mut to = rng.random_range(0..team_count - 1);
            if to >= from {
                to += 1;
            }

            if try_move(partition, graph, cluster, to, &mut current) {
                stats.moves += 1;
                stall = 0;
            } else if try_swap(partition, graph, cluster, to, &mut current, rng) {
                stats.swaps += 1;
                stall = 0;
            } else if try_exchange(partition, graph, cluster, to, &mut current, rng) {
                stats.exchanges += 1;
                stall = 0;
            } else {
                stall += 1;
                if stall >= self.stall_limit {
                    break;
                }
            }
        }

        stats.best = current;
        trace!(
            iterations = stats.iterations,
            moves = stats.moves,
            swaps = stats.swaps,
            exchanges = stats.exchanges,
            initial = stats.initial.total(),
            best = stats.best.total(),
            "local search finished"
        );
        stats
    }
}

impl Default for LocalSearchOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

fn try_move(
    partition: &mut Partition,
    graph: &ConstraintGraph,
    cluster_id: usize,
    to: usize,
    current: &mut Objective,
) -> bool {
    let cluster = graph.cluster(cluster_id);
    let Some(from) = partition.team_of(cluster_id) else {
        return false;
    };
    let target = &partition.bins[to];
    if target.size + cluster.size() > target.capacity
        || graph.has_conflict(cluster_id, &target.clusters, None)
    {
        return false;
    }

    partition.relocate(cluster, to);
    let candidate = evaluate(partition, graph);
    if candidate.improves_on(current) {
        *current = candidate;
        true
    } else {
        partition.relocate(cluster, from);
        false
    }
}

fn try_swap<R: Rng>(
    partition: &mut Partition,
    graph: &ConstraintGraph,
    cluster_id: usize,
    to: usize,
    current: &mut Objective,
    rng: &mut R,
) -> bool {
    let Some(from) = partition.team_of(cluster_id) else {
        return false;
    };
    let to_clusters = &partition.bins[to].clusters;
    if to_clusters.is_empty() {
        return false;
    }
    let other_id = to_clusters[rng.random_range(0..to_clusters.len())];

    let a = graph.cluster(cluster_id);
    let b = graph.cluster(other_id);
    let (from_bin, to_bin) = (&partition.bins[from], &partition.bins[to]);
    let from_size = from_bin.size - a.size() + b.size();
    let to_size = to_bin.size - b.size() + a.size();
    if (from_size > from_bin.capacity && from_size > from_bin.size)
        || (to_size > to_bin.capacity && to_size > to_bin.size)
    {
        return false;
    }
    if graph.has_conflict(cluster_id, &to_bin.clusters, Some(other_id))
        || graph.has_conflict(other_id, &from_bin.clusters, Some(cluster_id))
    {
        return false;
    }

    partition.swap(a, b);
    let candidate = evaluate(partition, graph);
    if candidate.improves_on(current) {
        *current = candidate;
        true
    } else {
        partition.swap(a, b);
        false
    }
}

/// Trades `cluster_id` for a group of smaller clusters in `to` whose sizes
/// add up to its own.
fn try_exchange<R: Rng>(
    partition: &mut Partition,
    graph: &ConstraintGraph,
    cluster_id: usize,
    to: usize,
    current: &mut Objective,
    rng: &mut R,
) -> bool {
    let cluster = graph.cluster(cluster_id);
    let need = cluster.size();
    let Some(from) = partition.team_of(cluster_id) else {
        return false;
    };
    if need < 2 {
        return false;
    }

    let stay: Vec<usize> = partition.bins[from]
        .clusters
        .iter()
        .copied()
        .filter(|&c| c != cluster_id)
        .collect();
    let mut pool: Vec<usize> = partition.bins[to]
        .clusters
        .iter()
        .copied()
        .filter(|&c| graph.cluster(c).size() < need && !graph.has_conflict(c, &stay, None))
        .collect();
    pool.shuffle(rng);

    let mut group = Vec::new();
    let mut size = 0;
    for c in pool {
        let s = graph.cluster(c).size();
        if size + s <= need {
            group.push(c);
            size += s;
            if size == need {
                break;
            }
        }
    }
    if size != need {
        return false;
    }
    let remaining: Vec<usize> = partition.bins[to]
        .clusters
        .iter()
        .copied()
        .filter(|c| !group.contains(c))
        .collect();
    if graph.has_conflict(cluster_id, &remaining, None) {
        return false;
    }

    partition.relocate(cluster, to);
    for &c in &group {
        partition.relocate(graph.cluster(c), from);
    }
    let candidate = evaluate(partition, graph);
    if candidate.improves_on(current) {
        *current = candidate;
        true
    } else {
        for &c in &group {
            partition.relocate(graph.cluster(c), to);
        }
        partition.relocate(cluster, from);
        false
    }
}
