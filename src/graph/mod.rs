//! Constraint graph: must-with clusters and hard exclusions.
//!
//! # Algorithm
//!
//! 1. Keep eligible individuals only; they form the pool (indices `0..n`
//!    in roster order).
//! 2. Resolve every `must_with` / `must_not_with` reference once
//!    (see [`ReferenceResolver`]).
//! 3. Union-find over must-with edges, treated as undirected: A naming B
//!    is enough to join them.
//! 4. Each connected component becomes a [`Cluster`] with precomputed size
//!    and skill sum.
//! 5. Exclusions are symmetrized into member pairs, then lifted to
//!    cluster-level conflict counts. Pairs that fall inside one cluster
//!    are kept apart as self-conflicts: they can never be honored.
//!
//! # Complexity
//! O(n α(n) + r) where r = number of references.

mod resolve;
mod union_find;

pub use resolve::{ReferenceResolver, Resolution};
pub use union_find::DisjointSet;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::models::{Cluster, Individual, Member};

/// Clusters and exclusions derived from a roster.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    members: Vec<Member>,
    clusters: Vec<Cluster>,
    cluster_of: Vec<usize>,
    /// Cross-cluster excluded pairs (pool indices, `a < b`).
    exclusions: Vec<(usize, usize)>,
    /// Excluded pairs inside a single cluster.
    self_conflicts: Vec<(usize, usize)>,
    /// cluster → (conflicting cluster → excluded pair count).
    conflicts: Vec<BTreeMap<usize, usize>>,
    unresolved: usize,
}

impl ConstraintGraph {
    /// Builds the graph from a roster; ineligible individuals are ignored.
    pub fn build(roster: &[Individual]) -> Self {
        let pool: Vec<&Individual> = roster.iter().filter(|p| p.eligible).collect();
        let resolver = ReferenceResolver::new(&pool);

        // Reference resolution
        let mut unresolved = 0usize;
        let mut sets = DisjointSet::new(pool.len());
        let mut excluded: BTreeSet<(usize, usize)> = BTreeSet::new();

        for (idx, individual) in pool.iter().enumerate() {
            for reference in &individual.must_with {
                match resolver.resolve(reference) {
                    Resolution::Resolved(other) if other != idx => {
                        sets.union(idx, other);
                    }
                    Resolution::Resolved(_) => {}
                    outcome => {
                        unresolved += 1;
                        debug!(
                            individual = %individual.id,
                            reference = %reference,
                            ?outcome,
                            "ignoring unresolved must-with reference"
                        );
                    }
                }
            }
            for reference in &individual.must_not_with {
                match resolver.resolve(reference) {
                    Resolution::Resolved(other) if other != idx => {
                        excluded.insert((idx.min(other), idx.max(other)));
                    }
                    Resolution::Resolved(_) => {}
                    outcome => {
                        unresolved += 1;
                        debug!(
                            individual = %individual.id,
                            reference = %reference,
                            ?outcome,
                            "ignoring unresolved must-not-with reference"
                        );
                    }
                }
            }
        }

        let members: Vec<Member> = pool
            .iter()
            .map(|p| Member::new(p.id.clone(), p.display_name(), p.skill))
            .collect();

        // Clusters
        let mut cluster_of = vec![0; pool.len()];
        let clusters: Vec<Cluster> = sets
            .groups()
            .into_iter()
            .enumerate()
            .map(|(id, group)| {
                let skill_sum = group.iter().map(|&m| members[m].skill).sum();
                for &m in &group {
                    cluster_of[m] = id;
                }
                Cluster::new(id, group, skill_sum)
            })
            .collect();

        // Exclusions, lifted to cluster conflicts
        let mut exclusions = Vec::new();
        let mut self_conflicts = Vec::new();
        let mut conflicts = vec![BTreeMap::new(); clusters.len()];
        for (a, b) in excluded {
            let (ca, cb) = (cluster_of[a], cluster_of[b]);
            if ca == cb {
                self_conflicts.push((a, b));
            } else {
                exclusions.push((a, b));
                *conflicts[ca].entry(cb).or_insert(0) += 1;
                *conflicts[cb].entry(ca).or_insert(0) += 1;
            }
        }

        debug!(
            eligible = members.len(),
            clusters = clusters.len(),
            exclusions = exclusions.len(),
            self_conflicts = self_conflicts.len(),
            unresolved,
            "constraint graph built"
        );

        Self {
            members,
            clusters,
            cluster_of,
            exclusions,
            self_conflicts,
            conflicts,
            unresolved,
        }
    }

    /// Eligible individuals, in roster order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of eligible individuals.
    pub fn eligible_count(&self) -> usize {
        self.members.len()
    }

    /// All clusters, ordered by their smallest member index.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// A cluster by id.
    pub fn cluster(&self, id: usize) -> &Cluster {
        &self.clusters[id]
    }

    /// Cluster containing a pool member.
    pub fn cluster_of(&self, member: usize) -> usize {
        self.cluster_of[member]
    }

    /// Size of the largest cluster (0 for an empty pool).
    pub fn largest_cluster_size(&self) -> usize {
        self.clusters.iter().map(Cluster::size).max().unwrap_or(0)
    }

    /// Sum of all eligible skills.
    pub fn total_skill(&self) -> f64 {
        self.members.iter().map(|m| m.skill).sum()
    }

    /// Cross-cluster excluded pairs.
    pub fn exclusions(&self) -> &[(usize, usize)] {
        &self.exclusions
    }

    /// Excluded pairs that share a cluster.
    pub fn self_conflicts(&self) -> &[(usize, usize)] {
        &self.self_conflicts
    }

    /// References that resolved to nobody.
    pub fn unresolved_references(&self) -> usize {
        self.unresolved
    }

    /// Number of excluded member pairs between two clusters.
    pub fn conflict_pairs(&self, a: usize, b: usize) -> usize {
        self.conflicts[a].get(&b).copied().unwrap_or(0)
    }

    /// Clusters that `cluster` must not share a team with, with pair counts.
    pub fn conflicting_clusters(&self, cluster: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.conflicts[cluster].iter().map(|(&c, &n)| (c, n))
    }

    /// Excluded pairs between `cluster` and a team's clusters, skipping `except`.
    pub fn conflict_count(&self, cluster: usize, team: &[usize], except: Option<usize>) -> usize {
        team.iter()
            .filter(|&&other| Some(other) != except)
            .map(|&other| self.conflict_pairs(cluster, other))
            .sum()
    }

    /// Whether `cluster` conflicts with any of a team's clusters, skipping `except`.
    pub fn has_conflict(&self, cluster: usize, team: &[usize], except: Option<usize>) -> bool {
        let own = &self.conflicts[cluster];
        !own.is_empty()
            && team
                .iter()
                .any(|other| Some(*other) != except && own.contains_key(other))
    }

    /// Ids of a cluster's members.
    pub fn member_ids(&self, cluster: usize) -> Vec<String> {
        self.clusters[cluster]
            .members
            .iter()
            .map(|&m| self.members[m].id.clone())
            .collect()
    }
}
