//! Dataset-level aggregation of per-site coordination statistics
//!
//! Each source site contributes its neighbor count and, when it has at least
//! one qualifying neighbor, its local mean and deviation. The aggregator turns
//! those into the summary stored with every coordination record:
//!
//! - **mean_local_deviation**: mean of the per-site deviations
//! - **global_mean**: mean of the per-site means
//! - **global_mean_deviation**: standard deviation of the per-site means
//! - **mean_neighbor_count**: mean number of kept neighbors per site
//!
//! Sites without neighbors only count towards `mean_neighbor_count`.
//!
//! # Example
//!
//! ```
//! use coordsweep::stats::CoordinationAggregator;
//!
//! let mut aggregator = CoordinationAggregator::new();
//! aggregator.add_site(&[2.0, 2.0]);
//! aggregator.add_site(&[3.0, 5.0]);
//! aggregator.add_site(&[]);
//!
//! let summary = aggregator.summary();
//! assert_eq!(summary.global_mean, Some(3.0));
//! assert_eq!(summary.mean_local_deviation, Some(0.5));
//! assert_eq!(summary.mean_neighbor_count, Some(4.0 / 3.0));
//! ```

use super::{mean, std_dev};
use serde::{Deserialize, Serialize};

/// Aggregate statistics over all sites of one coordination query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinationSummary {
    pub mean_local_deviation: Option<f64>,
    pub global_mean: Option<f64>,
    pub global_mean_deviation: Option<f64>,
    pub mean_neighbor_count: Option<f64>,
}

impl CoordinationSummary {
    /// True when every statistic is defined
    pub fn is_defined(&self) -> bool {
        self.mean_local_deviation.is_some()
            && self.global_mean.is_some()
            && self.global_mean_deviation.is_some()
            && self.mean_neighbor_count.is_some()
    }
}

/// Collects per-site distance lists and summarizes them
#[derive(Debug, Default)]
pub struct CoordinationAggregator {
    local_means: Vec<f64>,
    local_deviations: Vec<f64>,
    neighbor_counts: Vec<f64>,
}

impl CoordinationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one site's kept distances
    ///
    /// Returns the site's (mean, deviation), both `None` for an empty list.
    pub fn add_site(&mut self, distances: &[f64]) -> (Option<f64>, Option<f64>) {
        self.neighbor_counts.push(distances.len() as f64);

        let local_mean = mean(distances);
        let local_deviation = std_dev(distances);
        if let (Some(m), Some(d)) = (local_mean, local_deviation) {
            self.local_means.push(m);
            self.local_deviations.push(d);
        }

        (local_mean, local_deviation)
    }

    /// Number of sites added so far
    pub fn num_sites(&self) -> usize {
        self.neighbor_counts.len()
    }

    /// Number of sites with at least one neighbor
    pub fn num_defined_sites(&self) -> usize {
        self.local_means.len()
    }

    pub fn summary(&self) -> CoordinationSummary {
        CoordinationSummary {
            mean_local_deviation: mean(&self.local_deviations),
            global_mean: mean(&self.local_means),
            global_mean_deviation: std_dev(&self.local_means),
            mean_neighbor_count: mean(&self.neighbor_counts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_empty() {
        let aggregator = CoordinationAggregator::new();
        let summary = aggregator.summary();

        assert_eq!(aggregator.num_sites(), 0);
        assert_eq!(summary, CoordinationSummary::default());
        assert!(!summary.is_defined());
    }

    #[test]
    fn test_sites_without_neighbors() {
        let mut aggregator = CoordinationAggregator::new();
        assert_eq!(aggregator.add_site(&[]), (None, None));
        assert_eq!(aggregator.add_site(&[]), (None, None));

        let summary = aggregator.summary();
        assert_eq!(summary.global_mean, None);
        assert_eq!(summary.mean_local_deviation, None);
        assert_eq!(summary.mean_neighbor_count, Some(0.0));
        assert_eq!(aggregator.num_defined_sites(), 0);
    }

    #[test]
    fn test_global_mean_deviation() {
        let mut aggregator = CoordinationAggregator::new();
        aggregator.add_site(&[1.0]);
        aggregator.add_site(&[3.0]);

        let summary = aggregator.summary();
        assert_eq!(summary.global_mean, Some(2.0));
        assert_eq!(summary.global_mean_deviation, Some(1.0));
        assert_eq!(summary.mean_local_deviation, Some(0.0));
        assert!(summary.is_defined());
    }
}
