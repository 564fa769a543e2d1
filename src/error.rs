//! Partitioning error types.
//!
//! Only configuration problems are errors. Infeasible constraints are
//! reported as [`Diagnostic`](crate::models::Diagnostic)s on a result.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors rejected before any computation.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("team count must be at least 2, got {team_count}")]
    TooFewTeams { team_count: usize },

    #[error("team count {team_count} exceeds the number of eligible individuals ({eligible})")]
    TooManyTeams { team_count: usize, eligible: usize },

    #[error("invalid roster: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidRoster(Vec<ValidationError>),
}

impl PartitionError {
    /// Whether this is a team-count configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::TooFewTeams { .. } | Self::TooManyTeams { .. })
    }
}

pub type Result<T> = std::result::Result<T, PartitionError>;
