//! Working partition model.
//!
//! Cluster-level assignment of clusters to teams ("bins"), shared by the
//! greedy assigner and the local search. Each bin caches its size and
//! skill sum so objective evaluation stays O(k).

use serde::{Deserialize, Serialize};

use super::Cluster;

/// One team under construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bin {
    /// Target size.
    pub capacity: usize,
    /// Cluster ids placed in this bin, in placement order.
    pub clusters: Vec<usize>,
    /// Number of individuals.
    pub size: usize,
    /// Sum of individual skills.
    pub skill_sum: f64,
}

impl Bin {
    /// Creates an empty bin.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clusters: Vec::new(),
            size: 0,
            skill_sum: 0.0,
        }
    }

    /// Seats still free before reaching capacity.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.size)
    }

    /// Individuals beyond capacity.
    #[inline]
    pub fn overflow(&self) -> usize {
        self.size.saturating_sub(self.capacity)
    }

    /// Average skill (0.0 when empty).
    pub fn average(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.skill_sum / self.size as f64
        }
    }
}

/// A (possibly partial) assignment of clusters to teams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partition {
    /// Teams in order.
    pub bins: Vec<Bin>,
    team_of: Vec<Option<usize>>,
}

impl Partition {
    /// Creates an empty partition with one bin per capacity.
    pub fn new(capacities: &[usize], cluster_count: usize) -> Self {
        Self {
            bins: capacities.iter().map(|&c| Bin::new(c)).collect(),
            team_of: vec![None; cluster_count],
        }
    }

    /// Number of teams.
    #[inline]
    pub fn team_count(&self) -> usize {
        self.bins.len()
    }

    /// Team currently holding a cluster.
    #[inline]
    pub fn team_of(&self, cluster_id: usize) -> Option<usize> {
        self.team_of.get(cluster_id).copied().flatten()
    }

    /// Places an unassigned cluster into a team.
    pub fn assign(&mut self, cluster: &Cluster, team: usize) {
        debug_assert!(self.team_of[cluster.id].is_none());
        let bin = &mut self.bins[team];
        bin.clusters.push(cluster.id);
        bin.size += cluster.size();
        bin.skill_sum += cluster.skill_sum;
        self.team_of[cluster.id] = Some(team);
    }

    /// Removes a cluster from its team. No-op when unassigned.
    pub fn unassign(&mut self, cluster: &Cluster) {
        let Some(team) = self.team_of[cluster.id].take() else {
            return;
        };
        let bin = &mut self.bins[team];
        bin.clusters.retain(|&c| c != cluster.id);
        bin.size -= cluster.size();
        bin.skill_sum -= cluster.skill_sum;
    }

    /// Moves a cluster to another team.
    pub fn relocate(&mut self, cluster: &Cluster, to: usize) {
        self.unassign(cluster);
        self.assign(cluster, to);
    }

    /// Exchanges the teams of two clusters.
    pub fn swap(&mut self, a: &Cluster, b: &Cluster) {
        let (Some(team_a), Some(team_b)) = (self.team_of(a.id), self.team_of(b.id)) else {
            return;
        };
        self.unassign(a);
        self.unassign(b);
        self.assign(a, team_b);
        self.assign(b, team_a);
    }

    /// Whether every cluster has a team.
    pub fn is_complete(&self) -> bool {
        self.team_of.iter().all(Option::is_some)
    }

    /// Team sizes in order.
    pub fn sizes(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.size).collect()
    }

    /// Team averages in order.
    pub fn averages(&self) -> Vec<f64> {
        self.bins.iter().map(Bin::average).collect()
    }

    /// Total individuals beyond capacity across all teams.
    pub fn total_overflow(&self) -> usize {
        self.bins.iter().map(Bin::overflow).sum()
    }
}
