//! Post-search audit of a finished partition.
//!
//! Diagnostics are derived from the partition actually returned, not from
//! what the greedy pass had to relax, so they stay accurate after local
//! search repairs (or fails to repair) a relaxation.

use crate::graph::ConstraintGraph;
use crate::models::{Diagnostic, Partition};

/// Lists every constraint the partition does not satisfy.
pub(crate) fn audit(partition: &Partition, graph: &ConstraintGraph) -> Vec<Diagnostic> {
    let members = graph.members();
    let mut diagnostics = Vec::new();

    // Oversized clusters
    let largest = partition
        .bins
        .iter()
        .map(|b| b.capacity)
        .max()
        .unwrap_or(0);
    for cluster in graph.clusters() {
        if cluster.size() > largest {
            diagnostics.push(Diagnostic::oversized_cluster(
                partition.team_of(cluster.id),
                graph.member_ids(cluster.id),
                format!(
                    "{} individuals must play together but the largest team holds {largest}",
                    cluster.size()
                ),
            ));
        }
    }

    // Capacity
    for (index, bin) in partition.bins.iter().enumerate() {
        if bin.overflow() > 0 {
            let ids = bin
                .clusters
                .iter()
                .flat_map(|&c| graph.member_ids(c))
                .collect();
            diagnostics.push(Diagnostic::capacity_exceeded(
                index,
                ids,
                format!(
                    "Team {} holds {} individuals, capacity {}",
                    index + 1,
                    bin.size,
                    bin.capacity
                ),
            ));
        }
    }

    // Exclusions
    for &(a, b) in graph.exclusions() {
        let (Some(team), Some(other)) = (
            partition.team_of(graph.cluster_of(a)),
            partition.team_of(graph.cluster_of(b)),
        ) else {
            continue;
        };
        if team == other {
            diagnostics.push(Diagnostic::exclusion_violated(
                team,
                members[a].id.clone(),
                members[b].id.clone(),
                format!(
                    "{} and {} must not play together but share Team {}",
                    members[a].name,
                    members[b].name,
                    team + 1
                ),
            ));
        }
    }

    // Self-conflicts
    for &(a, b) in graph.self_conflicts() {
        diagnostics.push(Diagnostic::self_conflicting(
            partition.team_of(graph.cluster_of(a)),
            members[a].id.clone(),
            members[b].id.clone(),
            format!(
                "{} and {} must not play together but are linked by must-play-with",
                members[a].name, members[b].name
            ),
        ));
    }

    diagnostics
}

/// Checks the structural guarantees of a returned partition.
///
/// Bijection with the eligible pool and cluster integrity always hold;
/// every overflow or shared excluded pair must carry a diagnostic.
pub(crate) fn check_invariants(
    partition: &Partition,
    graph: &ConstraintGraph,
    diagnostics: &[Diagnostic],
) -> Result<(), String> {
    let mut seen = vec![0usize; graph.clusters().len()];
    for (index, bin) in partition.bins.iter().enumerate() {
        let mut size = 0;
        for &c in &bin.clusters {
            seen[c] += 1;
            size += graph.cluster(c).size();
            if partition.team_of(c) != Some(index) {
                return Err(format!("cluster {c} listed in team {index} but mapped elsewhere"));
            }
        }
        if size != bin.size {
            return Err(format!("team {index} caches size {} but holds {size}", bin.size));
        }
        if bin.overflow() > 0 && !diagnostics.iter().any(|d| d.team == Some(index)) {
            return Err(format!("team {index} over capacity without a diagnostic"));
        }
    }
    if let Some(c) = seen.iter().position(|&n| n != 1) {
        return Err(format!("cluster {c} placed {} times", seen[c]));
    }

    let members = graph.members();
    for &(a, b) in graph.exclusions() {
        let team = partition.team_of(graph.cluster_of(a));
        if team == partition.team_of(graph.cluster_of(b))
            && !diagnostics
                .iter()
                .any(|d| d.involves(&members[a].id) && d.involves(&members[b].id))
        {
            return Err(format!(
                "{} and {} share a team without a diagnostic",
                members[a].id, members[b].id
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiagnosticKind, Individual};

    #[test]
    fn test_clean_partition_has_no_diagnostics() {
        let graph = ConstraintGraph::build(&[
            Individual::new("a", 5.0).with_must_not_with("b"),
            Individual::new("b", 5.0),
        ]);
        let mut p = Partition::new(&[1, 1], 2);
        p.assign(graph.cluster(0), 0);
        p.assign(graph.cluster(1), 1);

        let diagnostics = audit(&p, &graph);
        assert!(diagnostics.is_empty());
        assert_eq!(check_invariants(&p, &graph, &diagnostics), Ok(()));
    }

    #[test]
    fn test_reports_every_violation() {
        let graph = ConstraintGraph::build(&[
            Individual::new("a", 5.0).with_must_not_with("b"),
            Individual::new("b", 5.0),
            Individual::new("c", 5.0),
            Individual::new("d", 5.0),
        ]);
        let mut p = Partition::new(&[2, 2], 4);
        for c in 0..3 {
            p.assign(graph.cluster(c), 0);
        }
        p.assign(graph.cluster(3), 1);

        let diagnostics = audit(&p, &graph);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::CapacityExceeded, DiagnosticKind::ExclusionViolated]
        );
        assert_eq!(diagnostics[0].individuals, vec!["a", "b", "c"]);
        assert!(diagnostics[1].involves("a") && diagnostics[1].involves("b"));
        assert_eq!(check_invariants(&p, &graph, &diagnostics), Ok(()));
        assert!(check_invariants(&p, &graph, &[]).is_err());
    }

    #[test]
    fn test_oversized_and_self_conflicting_clusters() {
        let graph = ConstraintGraph::build(&[
            Individual::new("a", 5.0)
                .with_must_with("b")
                .with_must_with("c")
                .with_must_not_with("c"),
            Individual::new("b", 5.0),
            Individual::new("c", 5.0),
            Individual::new("d", 5.0),
        ]);
        let mut p = Partition::new(&[2, 2], graph.clusters().len());
        p.assign(graph.cluster(0), 0);
        p.assign(graph.cluster(1), 1);

        let diagnostics = audit(&p, &graph);
        let kinds: Vec<_> = diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::OversizedCluster,
                DiagnosticKind::CapacityExceeded,
                DiagnosticKind::SelfConflictingCluster,
            ]
        );
        assert_eq!(diagnostics[0].team, Some(0));
        assert_eq!(diagnostics[2].individuals, vec!["a", "c"]);
    }

    #[test]
    fn test_detects_unplaced_cluster() {
        let graph = ConstraintGraph::build(&[Individual::new("a", 1.0), Individual::new("b", 1.0)]);
        let mut p = Partition::new(&[1, 1], 2);
        p.assign(graph.cluster(0), 0);
        assert!(check_invariants(&p, &graph, &[]).is_err());
    }
}
