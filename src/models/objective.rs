//! Objective score model.
//!
//! Lower is better. `imbalance` is the population variance of team
//! averages; `penalty` is zero for a fully valid partition and grows with
//! every tolerated exclusion or capacity overflow.

use serde::{Deserialize, Serialize};

/// Improvements smaller than this are treated as ties.
pub const IMPROVEMENT_EPSILON: f64 = 1e-12;

/// Scalar imbalance measure, split into its two terms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Variance of team averages.
    pub imbalance: f64,
    /// Weighted count of tolerated constraint violations.
    pub penalty: f64,
}

impl Objective {
    /// Creates an objective from its terms.
    pub fn new(imbalance: f64, penalty: f64) -> Self {
        Self { imbalance, penalty }
    }

    /// Combined score.
    #[inline]
    pub fn total(&self) -> f64 {
        self.imbalance + self.penalty
    }

    /// Whether `self` is strictly better than `other`.
    #[inline]
    pub fn improves_on(&self, other: &Objective) -> bool {
        self.total() < other.total() - IMPROVEMENT_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_improvement() {
        let a = Objective::new(0.5, 0.0);
        let b = Objective::new(0.25, 100.0);
        assert!((b.total() - 100.25).abs() < 1e-10);
        assert!(a.improves_on(&b));
        assert!(!b.improves_on(&a));
    }

    #[test]
    fn test_ties_do_not_improve() {
        let a = Objective::new(1.0, 0.0);
        let b = Objective::new(1.0 + 1e-15, 0.0);
        assert!(!a.improves_on(&b));
        assert!(!b.improves_on(&a));
    }
}
