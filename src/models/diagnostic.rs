//! Diagnostics attached to a partition result.
//!
//! Infeasibility is reported as data rather than as an error: an organizer
//! can still use an imperfect partition, so the engine always returns one
//! and lists what it could not honor.

use serde::{Deserialize, Serialize};

/// A constraint the returned partition does not satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category.
    pub kind: DiagnosticKind,
    /// Team involved, if any.
    pub team: Option<usize>,
    /// Individual ids involved (cluster members or an excluded pair).
    pub individuals: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

/// Categories of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A must-with cluster is larger than every team's capacity.
    OversizedCluster,
    /// A team holds more individuals than its capacity.
    CapacityExceeded,
    /// Two individuals excluding each other share a team.
    ExclusionViolated,
    /// A must-with cluster contains an excluded pair; it cannot be honored.
    SelfConflictingCluster,
}

impl Diagnostic {
    /// Creates an oversized-cluster diagnostic.
    pub fn oversized_cluster(
        team: Option<usize>,
        individuals: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::OversizedCluster,
            team,
            individuals,
            message: message.into(),
        }
    }

    /// Creates a capacity-exceeded diagnostic.
    pub fn capacity_exceeded(
        team: usize,
        individuals: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::CapacityExceeded,
            team: Some(team),
            individuals,
            message: message.into(),
        }
    }

    /// Creates an exclusion-violated diagnostic for one pair.
    pub fn exclusion_violated(
        team: usize,
        a: impl Into<String>,
        b: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::ExclusionViolated,
            team: Some(team),
            individuals: vec![a.into(), b.into()],
            message: message.into(),
        }
    }

    /// Creates a self-conflicting-cluster diagnostic for one pair.
    pub fn self_conflicting(
        team: Option<usize>,
        a: impl Into<String>,
        b: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::SelfConflictingCluster,
            team,
            individuals: vec![a.into(), b.into()],
            message: message.into(),
        }
    }

    /// Whether the diagnostic names the given individual.
    pub fn involves(&self, id: &str) -> bool {
        self.individuals.iter().any(|i| i == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_factories() {
        let d1 = Diagnostic::oversized_cluster(Some(0), vec!["a".into(), "b".into()], "too big");
        assert_eq!(d1.kind, DiagnosticKind::OversizedCluster);
        assert!(d1.involves("b"));

        let d2 = Diagnostic::capacity_exceeded(2, vec![], "over");
        assert_eq!(d2.kind, DiagnosticKind::CapacityExceeded);
        assert_eq!(d2.team, Some(2));

        let d3 = Diagnostic::exclusion_violated(1, "x", "y", "clash");
        assert_eq!(d3.kind, DiagnosticKind::ExclusionViolated);
        assert_eq!(d3.individuals, vec!["x".to_string(), "y".to_string()]);

        let d4 = Diagnostic::self_conflicting(None, "p", "q", "contradiction");
        assert_eq!(d4.kind, DiagnosticKind::SelfConflictingCluster);
        assert!(!d4.involves("z"));
    }
}
