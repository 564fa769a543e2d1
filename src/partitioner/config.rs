//! Partitioner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Trial and search settings for one partitioning call.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use u_teams::partitioner::PartitionConfig;
///
/// let config = PartitionConfig::default()
///     .with_trials(24)
///     .with_seed(7)
///     .with_time_limit(Duration::from_millis(200));
/// assert_eq!(config.trials, 24);
/// assert_eq!(config.seed, Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Independent greedy + local-search runs (at least 1 is executed).
    pub trials: usize,
    /// Base seed. `None` draws one and records it in the result.
    pub seed: Option<u64>,
    /// Local-search iteration budget per trial.
    pub max_iterations: usize,
    /// Consecutive non-improving iterations before a trial stops.
    pub stall_limit: usize,
    /// Wall-clock budget shared by all trials.
    pub time_limit: Option<Duration>,
    /// Run trials on the rayon pool.
    pub parallel: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            trials: 12,
            seed: None,
            max_iterations: 1200,
            stall_limit: 400,
            time_limit: None,
            parallel: true,
        }
    }
}

impl PartitionConfig {
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_stall_limit(mut self, stall_limit: usize) -> Self {
        self.stall_limit = stall_limit;
        self
    }

    /// Sets a wall-clock budget. Results stop being reproducible when
    /// the budget cuts a trial short.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
