//! Partitioning pipeline orchestration.
//!
//! # Algorithm
//!
//! 1. Reject bad team counts and malformed rosters.
//! 2. Build the [`ConstraintGraph`] and plan capacities once.
//! 3. Run independent trials, each: seeded RNG → placement order →
//!    [`GreedyAssigner`] → [`LocalSearchOptimizer`] → audit.
//! 4. A trial left with a violated exclusion or an overfilled team (and no
//!    oversized cluster to blame) restarts local search from the
//!    [`FeasibilitySearch`] assignment, computed once and shared by all
//!    trials, and keeps the better of the two.
//! 5. Keep the best trial: valid partitions before diagnosed ones, then
//!    lower objective, then lower trial index.
//!
//! Trial 0 uses the plain heavy-first order. Odd trials jitter cluster
//! weights within a band of the weight spread; other even trials shuffle
//! clusters of equal skill sum. Every trial derives its RNG from the base
//! seed and its index, so parallel and sequential runs pick the same result.
//!
//! # Reference
//! Lourenço, Martin & Stützle (2003), "Iterated Local Search" (multi-start)

mod audit;
mod config;

pub use config::PartitionConfig;

use std::cmp::Ordering;
use std::sync::OnceLock;
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::assign::{FeasibilitySearch, GreedyAssigner};
use crate::error::{PartitionError, Result};
use crate::graph::ConstraintGraph;
use crate::models::{
    Diagnostic, DiagnosticKind, Individual, Objective, Partition, PartitionResult, Team,
};
use crate::planner::CapacityPlanner;
use crate::search::LocalSearchOptimizer;
use crate::validation::validate_roster;

/// Jitter band of odd trials, as a fraction of the cluster weight spread.
const ORDER_BAND: f64 = 0.25;

/// Runs the full pipeline over several seeded trials.
///
/// # Example
///
/// ```
/// use u_teams::models::Individual;
/// use u_teams::partitioner::{PartitionConfig, Partitioner};
///
/// let roster: Vec<Individual> = [9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &s)| Individual::new(format!("p{i}"), s))
///     .collect();
///
/// let partitioner = Partitioner::new(PartitionConfig::default().with_seed(42));
/// let result = partitioner.partition(&roster, 2).unwrap();
/// assert!(result.is_valid());
/// assert_eq!(result.teams[0].size(), 4);
/// assert_eq!(result.teams[1].size(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    config: PartitionConfig,
}

struct TrialOutcome {
    index: usize,
    partition: Partition,
    objective: Objective,
    diagnostics: Vec<Diagnostic>,
}

impl TrialOutcome {
    fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn rank(&self, other: &Self) -> Ordering {
        other
            .is_valid()
            .cmp(&self.is_valid())
            .then_with(|| self.objective.total().total_cmp(&other.objective.total()))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl Partitioner {
    /// Creates a partitioner.
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Splits the eligible part of `roster` into `team_count` teams.
    ///
    /// # Errors
    /// - [`PartitionError::TooFewTeams`] when `team_count < 2`
    /// - [`PartitionError::InvalidRoster`] for empty/duplicate ids or
    ///   non-finite skills
    /// - [`PartitionError::TooManyTeams`] when `team_count` exceeds the
    ///   eligible count
    ///
    /// Infeasible constraints are not errors; see
    /// [`PartitionResult::diagnostics`].
    pub fn partition(&self, roster: &[Individual], team_count: usize) -> Result<PartitionResult> {
        // Input checks
        if team_count < 2 {
            return Err(PartitionError::TooFewTeams { team_count });
        }
        validate_roster(roster).map_err(PartitionError::InvalidRoster)?;
        let eligible = roster.iter().filter(|p| p.eligible).count();
        if team_count > eligible {
            return Err(PartitionError::TooManyTeams {
                team_count,
                eligible,
            });
        }

        // Setup shared by all trials
        let graph = ConstraintGraph::build(roster);
        let capacities = CapacityPlanner::plan(graph.eligible_count(), team_count);
        let feasible = OnceLock::new();
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);
        let trials = self.config.trials.max(1);

        debug!(
            eligible,
            team_count,
            clusters = graph.clusters().len(),
            largest_cluster = graph.largest_cluster_size(),
            trials,
            seed,
            "starting partition"
        );

        // Trials
        let run = |index: usize| {
            self.run_trial(&graph, &capacities, &feasible, seed, index, deadline)
        };
        let outcomes: Vec<TrialOutcome> = if self.config.parallel {
            (0..trials).into_par_iter().map(run).collect()
        } else {
            (0..trials).map(run).collect()
        };

        // Reduction
        let valid_trials = outcomes.iter().filter(|o| o.is_valid()).count();
        let Some(best) = outcomes.into_iter().min_by(|a, b| a.rank(b)) else {
            // trials >= 1, so at least one outcome exists
            unreachable!("no trial outcome");
        };

        debug_assert_eq!(
            audit::check_invariants(&best.partition, &graph, &best.diagnostics),
            Ok(()),
            "partition invariant violated"
        );

        if best.is_valid() {
            info!(
                trial = best.index,
                objective = best.objective.total(),
                valid_trials,
                "partition chosen"
            );
        } else {
            warn!(
                trial = best.index,
                objective = best.objective.total(),
                diagnostics = best.diagnostics.len(),
                "no valid partition found, returning least-bad trial"
            );
        }

        Ok(PartitionResult {
            teams: build_teams(&best.partition, &graph),
            objective: best.objective,
            diagnostics: best.diagnostics,
            seed,
            trial: best.index,
            trials_run: trials,
            valid_trials,
            unresolved_references: graph.unresolved_references(),
        })
    }

    fn run_trial(
        &self,
        graph: &ConstraintGraph,
        capacities: &[usize],
        feasible: &OnceLock<Option<Partition>>,
        seed: u64,
        index: usize,
        deadline: Option<Instant>,
    ) -> TrialOutcome {
        let mut rng = SmallRng::seed_from_u64(trial_seed(seed, index));
        let order = if index % 2 == 1 {
            GreedyAssigner::banded_order(graph.clusters(), &mut rng, ORDER_BAND)
        } else {
            GreedyAssigner::placement_order(graph.clusters(), &mut rng, index > 0)
        };
        let partition = GreedyAssigner::new().assign(graph, capacities, &order, &mut rng);
        let outcome = self.improve(graph, partition, index, deadline, &mut rng);
        if !repairable(&outcome.diagnostics) {
            return outcome;
        }

        let start = feasible.get_or_init(|| FeasibilitySearch::new().find(graph, capacities));
        let Some(start) = start.clone() else {
            return outcome;
        };
        let repaired = self.improve(graph, start, index, deadline, &mut rng);
        debug!(
            trial = index,
            greedy = outcome.objective.total(),
            repaired = repaired.objective.total(),
            "restarted from feasible assignment"
        );
        if repaired.rank(&outcome) == Ordering::Less {
            repaired
        } else {
            outcome
        }
    }

    /// Local search from `partition`, then audit.
    fn improve(
        &self,
        graph: &ConstraintGraph,
        mut partition: Partition,
        index: usize,
        deadline: Option<Instant>,
        rng: &mut SmallRng,
    ) -> TrialOutcome {
        let stats = LocalSearchOptimizer::new()
            .with_max_iterations(self.config.max_iterations)
            .with_stall_limit(self.config.stall_limit)
            .with_deadline(deadline)
            .optimize(&mut partition, graph, rng);
        let diagnostics = audit::audit(&partition, graph);

        debug!(
            trial = index,
            start = stats.initial.total(),
            objective = stats.best.total(),
            iterations = stats.iterations,
            diagnostics = diagnostics.len(),
            "trial finished"
        );

        TrialOutcome {
            index,
            partition,
            objective: stats.best,
            diagnostics,
        }
    }
}

/// Whether a different placement might clear these diagnostics.
fn repairable(diagnostics: &[Diagnostic]) -> bool {
    let kinds = || diagnostics.iter().map(|d| d.kind);
    !kinds().any(|k| k == DiagnosticKind::OversizedCluster)
        && kinds().any(|k| {
            matches!(
                k,
                DiagnosticKind::ExclusionViolated | DiagnosticKind::CapacityExceeded
            )
        })
}

/// Partitions `roster` into `team_count` teams with `config`.
///
/// Shorthand for `Partitioner::new(config.clone()).partition(roster, team_count)`.
pub fn compute_partition(
    roster: &[Individual],
    team_count: usize,
    config: &PartitionConfig,
) -> Result<PartitionResult> {
    Partitioner::new(config.clone()).partition(roster, team_count)
}

/// Derives the RNG seed of one trial (splitmix64 finalizer).
fn trial_seed(base: u64, index: usize) -> u64 {
    let mut z = base.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn build_teams(partition: &Partition, graph: &ConstraintGraph) -> Vec<Team> {
    partition
        .bins
        .iter()
        .enumerate()
        .map(|(index, bin)| {
            let mut team = Team::new(index, bin.capacity);
            for &c in &bin.clusters {
                for &m in &graph.cluster(c).members {
                    team.add_member(graph.members()[m].clone());
                }
            }
            team.sort_members();
            team
        })
        .collect()
}
