//! Sweep definition structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open numeric range `[min, max)` sampled every `step`
///
/// Follows the `arange` convention: `ceil((max - min) / step)` points at
/// `min + i * step`. `max` itself is only reached when it lies on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Grid {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Number of grid points (0 for an empty or invalid range)
    pub fn len(&self) -> usize {
        if !(self.step > 0.0) || !(self.max > self.min) {
            return 0;
        }
        ((self.max - self.min) / self.step).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid points in ascending order
    pub fn values(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.min, self.max, self.step)
    }
}

/// Condition swept by a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweptDimension {
    Temperature,
    ChemicalPotential,
}

/// Sweep direction of a Monte Carlo job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Heating at fixed chemical potential
    TUp,
    /// Cooling at fixed chemical potential
    TDown,
    /// Increasing chemical potential at fixed temperature
    XiUp,
    /// Decreasing chemical potential at fixed temperature
    XiDown,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::TUp, Direction::TDown, Direction::XiUp, Direction::XiDown];

    /// Prefix of the job directory name
    pub fn dir_prefix(self) -> &'static str {
        match self {
            Direction::TUp => "T_up",
            Direction::TDown => "T_down",
            Direction::XiUp => "xi_up",
            Direction::XiDown => "xi_down",
        }
    }

    pub fn swept(self) -> SweptDimension {
        match self {
            Direction::TUp | Direction::TDown => SweptDimension::Temperature,
            Direction::XiUp | Direction::XiDown => SweptDimension::ChemicalPotential,
        }
    }

    /// True when the swept condition increases
    pub fn ascending(self) -> bool {
        matches!(self, Direction::TUp | Direction::XiUp)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_prefix())
    }
}

/// What to do when a job directory already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistingJobPolicy {
    /// Leave the directory alone and do not run the job
    #[default]
    Skip,
    /// Abort the sweep
    Fail,
    /// Rewrite the input file and run again
    Overwrite,
}

impl fmt::Display for ExistingJobPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExistingJobPolicy::Skip => write!(f, "skip"),
            ExistingJobPolicy::Fail => write!(f, "fail"),
            ExistingJobPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_grid_length() {
        let grid = Grid::new(200.0, 841.0, 20.0);
        let values = grid.values();

        assert_eq!(values.len(), 33);
        assert_eq!(values[0], 200.0);
        assert_eq!(values[1], 220.0);
        assert_eq!(*values.last().unwrap(), 840.0);
    }

    #[test]
    fn test_potential_grid_length() {
        let grid = Grid::new(-1.5, 2.501, 0.05);
        let values = grid.values();

        assert_eq!(values.len(), 81);
        assert!((values[0] + 1.5).abs() < 1e-12);
        assert!((values[80] - 2.5).abs() < 1e-9);
        assert!(values.iter().all(|v| *v < 2.501));
    }

    #[test]
    fn test_exclusive_upper_bound() {
        assert_eq!(Grid::new(0.0, 10.0, 2.0).values(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_invalid_grid_is_empty() {
        assert!(Grid::new(1.0, 0.0, 0.5).is_empty());
        assert!(Grid::new(0.0, 1.0, 0.0).is_empty());
        assert!(Grid::new(0.0, 1.0, -0.5).is_empty());
    }

    #[test]
    fn test_direction_prefixes() {
        assert_eq!(Direction::TUp.to_string(), "T_up");
        assert_eq!(Direction::XiDown.to_string(), "xi_down");
        assert_eq!(Direction::XiDown.swept(), SweptDimension::ChemicalPotential);
        assert!(!Direction::TDown.ascending());
    }
}
