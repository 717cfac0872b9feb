//! Neighbor-statistics queries

use super::species::{Element, SpeciesGroup};
use crate::stats::CoordinationSummary;
use serde::{Deserialize, Serialize};

/// One coordination measurement: distances from every site of `source` to
/// its `k` nearest `target` neighbors inside `radius`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborQuery {
    /// Key of the resulting record (e.g. "Na1-O")
    pub label: String,
    pub source: SpeciesGroup,
    pub target: Element,
    /// Search radius in Å (inclusive)
    pub radius: f64,
    /// Maximum number of distances kept per site
    pub k: usize,
    /// Distances must be strictly greater than this
    #[serde(default)]
    pub min_distance: f64,
}

impl NeighborQuery {
    pub fn new(
        label: impl Into<String>,
        source: SpeciesGroup,
        target: Element,
        radius: f64,
        k: usize,
    ) -> Self {
        Self {
            label: label.into(),
            source,
            target,
            radius,
            k,
            min_distance: 0.0,
        }
    }

    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Human-readable pair, e.g. "Na1 - O"
    pub fn coordination(&self) -> String {
        format!("{} - {}", self.source, self.target)
    }

    /// The standard nine measurements: five bond shells and four
    /// transition-metal first-neighbor distances
    pub fn default_set() -> Vec<NeighborQuery> {
        use Element as E;
        use SpeciesGroup as G;

        vec![
            NeighborQuery::new("Na1-O", G::Na1, E::O, 3.0, 6),
            NeighborQuery::new("Na2-O", G::Na2, E::O, 5.0, 10),
            NeighborQuery::new("P-O", G::P, E::O, 3.0, 4),
            NeighborQuery::new("Ti-O", G::Ti, E::O, 4.0, 6),
            NeighborQuery::new("Mn-O", G::Mn, E::O, 4.0, 6),
            NeighborQuery::new("Ti-Ti first_near_site", G::Ti, E::Ti, 5.55, 1),
            NeighborQuery::new("Ti-Mn first_near_site", G::Ti, E::Mn, 5.55, 1),
            NeighborQuery::new("Mn-Mn first_near_site", G::Mn, E::Mn, 5.55, 1),
            NeighborQuery::new("Mn-Ti first_near_site", G::Mn, E::Ti, 5.55, 1),
        ]
    }
}

/// Statistics of one source site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCoordination {
    /// Index of the site in the structure
    pub site_index: usize,
    /// Fractional coordinates of the site
    pub coords: [f64; 3],
    /// Kept neighbor distances, ascending, at most `k`
    pub distances: Vec<f64>,
    pub local_mean: Option<f64>,
    pub local_deviation: Option<f64>,
}

/// Result of a [`NeighborQuery`]: per-site and dataset-level statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationRecord {
    /// Pair description, e.g. "Na1 - O"
    pub coordination: String,
    pub query: NeighborQuery,
    pub sites: Vec<SiteCoordination>,
    pub summary: CoordinationSummary,
}
