//! Descriptive statistics
//!
//! Small helpers for the neighbor-distance statistics. Every function returns
//! `None` for an empty input instead of a NaN, so callers have to handle the
//! "no neighbors" case explicitly.
//!
//! # Example
//!
//! ```
//! use coordsweep::stats::{mean, std_dev};
//!
//! let distances = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
//! assert_eq!(mean(&distances), Some(5.0));
//! assert_eq!(std_dev(&distances), Some(2.0));
//! assert_eq!(mean(&[]), None);
//! ```

pub mod aggregator;

pub use aggregator::{CoordinationAggregator, CoordinationSummary};

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by N)
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}
