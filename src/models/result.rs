//! Partition result (solution) model.
//!
//! What the presentation and session layers consume: ordered teams, the
//! objective the chosen trial reached, and any diagnostics.

use serde::{Deserialize, Serialize};

use super::{Diagnostic, DiagnosticKind, Objective, Team};

/// The chosen partition plus how it was obtained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionResult {
    /// Teams in order.
    pub teams: Vec<Team>,
    /// Objective reached by the chosen trial.
    pub objective: Objective,
    /// Constraints the partition does not satisfy (empty when valid).
    pub diagnostics: Vec<Diagnostic>,
    /// Base seed; rerunning with it reproduces this result.
    pub seed: u64,
    /// Index of the chosen trial.
    pub trial: usize,
    /// Number of trials executed.
    pub trials_run: usize,
    /// Trials that produced a fully valid partition.
    pub valid_trials: usize,
    /// Relationship references that resolved to nobody.
    pub unresolved_references: usize,
}

impl PartitionResult {
    /// Whether no diagnostic was raised.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == kind).collect()
    }

    /// Index of the team holding an individual.
    pub fn team_of(&self, id: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.contains(id))
    }

    /// Whether two individuals share a team.
    pub fn same_team(&self, a: &str, b: &str) -> bool {
        match (self.team_of(a), self.team_of(b)) {
            (Some(ta), Some(tb)) => ta == tb,
            _ => false,
        }
    }

    /// Total placed individuals.
    pub fn member_count(&self) -> usize {
        self.teams.iter().map(Team::size).sum()
    }

    /// Team averages in order.
    pub fn averages(&self) -> Vec<f64> {
        self.teams.iter().map(Team::average).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;

    fn sample_result() -> PartitionResult {
        let mut t1 = Team::new(0, 2);
        t1.add_member(Member::new("a", "A", 9.0));
        t1.add_member(Member::new("d", "D", 2.0));
        let mut t2 = Team::new(1, 2);
        t2.add_member(Member::new("b", "B", 6.0));
        t2.add_member(Member::new("c", "C", 5.0));

        PartitionResult {
            teams: vec![t1, t2],
            objective: Objective::default(),
            diagnostics: Vec::new(),
            seed: 42,
            trial: 0,
            trials_run: 1,
            valid_trials: 1,
            unresolved_references: 0,
        }
    }

    #[test]
    fn test_result_lookup() {
        let r = sample_result();
        assert!(r.is_valid());
        assert_eq!(r.team_of("c"), Some(1));
        assert_eq!(r.team_of("zz"), None);
        assert!(r.same_team("a", "d"));
        assert!(!r.same_team("a", "b"));
        assert!(!r.same_team("a", "zz"));
        assert_eq!(r.member_count(), 4);
        assert_eq!(r.averages(), vec![5.5, 5.5]);
    }

    #[test]
    fn test_diagnostics_filter() {
        let mut r = sample_result();
        r.diagnostics
            .push(Diagnostic::exclusion_violated(0, "a", "d", "clash"));
        assert!(!r.is_valid());
        assert_eq!(r.diagnostics_of(DiagnosticKind::ExclusionViolated).len(), 1);
        assert!(r.diagnostics_of(DiagnosticKind::CapacityExceeded).is_empty());
    }

    #[test]
    fn test_result_serializes() {
        let r = sample_result();
        let json = serde_json::to_string(&r).unwrap();
        let back: PartitionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.teams.len(), 2);
        assert_eq!(back.teams[1].members[0].id, "b");
        assert_eq!(back.seed, 42);
    }
}
