//! Partition balance metrics (KPIs).
//!
//! Summarizes how even a finished partition is, for display next to the
//! team sheets.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Overall average | Mean skill over all placed individuals |
//! | Average spread | max(team average) - min(team average) |
//! | Average stddev | Population std. deviation of team averages |
//! | Size spread | Largest team size - smallest team size |
//! | Sum spread | Largest team skill sum - smallest team skill sum |

use crate::models::PartitionResult;

/// Balance indicators of a partition.
#[derive(Debug, Clone)]
pub struct BalanceKpi {
    /// Average skill per team, in team order.
    pub team_averages: Vec<f64>,
    /// Mean skill over all placed individuals.
    pub overall_average: f64,
    /// Lowest team average.
    pub min_average: f64,
    /// Highest team average.
    pub max_average: f64,
    /// Highest minus lowest team average.
    pub average_spread: f64,
    /// Population standard deviation of team averages.
    pub average_stddev: f64,
    /// Largest minus smallest team size.
    pub size_spread: usize,
    /// Largest minus smallest team skill sum.
    pub sum_spread: f64,
}

impl BalanceKpi {
    /// Computes KPIs from a partition result.
    pub fn calculate(result: &PartitionResult) -> Self {
        let team_averages = result.averages();
        if team_averages.is_empty() {
            return Self {
                team_averages,
                overall_average: 0.0,
                min_average: 0.0,
                max_average: 0.0,
                average_spread: 0.0,
                average_stddev: 0.0,
                size_spread: 0,
                sum_spread: 0.0,
            };
        }

        // Averages
        let members = result.member_count();
        let total: f64 = result.teams.iter().map(|t| t.skill_sum).sum();
        let overall_average = if members == 0 {
            0.0
        } else {
            total / members as f64
        };

        let min_average = team_averages.iter().copied().fold(f64::INFINITY, f64::min);
        let max_average = team_averages
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let k = team_averages.len() as f64;
        let mean = team_averages.iter().sum::<f64>() / k;
        let variance = team_averages
            .iter()
            .map(|a| (a - mean).powi(2))
            .sum::<f64>()
            / k;

        // Spreads
        let sizes = result.teams.iter().map(|t| t.size());
        let size_spread = sizes.clone().max().unwrap_or(0) - sizes.min().unwrap_or(0);

        let min_sum = result
            .teams
            .iter()
            .map(|t| t.skill_sum)
            .fold(f64::INFINITY, f64::min);
        let max_sum = result
            .teams
            .iter()
            .map(|t| t.skill_sum)
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            team_averages,
            overall_average,
            min_average,
            max_average,
            average_spread: max_average - min_average,
            average_stddev: variance.sqrt(),
            size_spread,
            sum_spread: max_sum - min_sum,
        }
    }

    /// Whether the partition meets the given balance thresholds.
    pub fn meets_thresholds(&self, max_average_spread: f64, max_size_spread: usize) -> bool {
        self.average_spread <= max_average_spread && self.size_spread <= max_size_spread
    }
}
