//! Capacity planning.
//!
//! Splits `n` individuals into `k` target sizes that differ by at most one:
//! every team gets `floor(n / k)` seats and the first `n mod k` teams get
//! one extra. Deterministic.

/// Computes per-team target sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityPlanner;

impl CapacityPlanner {
    /// Target sizes for `n` individuals over `k` teams.
    ///
    /// Returns an empty vector when `k == 0`.
    ///
    /// # Example
    /// ```
    /// use u_teams::planner::CapacityPlanner;
    ///
    /// assert_eq!(CapacityPlanner::plan(11, 3), vec![4, 4, 3]);
    /// ```
    pub fn plan(n: usize, k: usize) -> Vec<usize> {
        if k == 0 {
            return Vec::new();
        }
        let base = n / k;
        let extra = n % k;
        (0..k).map(|i| base + usize::from(i < extra)).collect()
    }

    /// Largest target size, i.e. `ceil(n / k)`.
    pub fn max_capacity(n: usize, k: usize) -> usize {
        if k == 0 {
            0
        } else {
            n.div_ceil(k)
        }
    }
}
