//! Coordination analysis of a relaxed structure
//!
//! [`Analyzer`] owns a structure and its species classification and answers
//! [`NeighborQuery`]s against it.
//!
//! # Algorithm
//!
//! For every site of the query's source group:
//!
//! 1. Collect all periodic neighbors within `radius`
//! 2. Keep those of the target element farther than `min_distance`
//! 3. Sort ascending and keep the first `k`
//! 4. Record mean and population deviation of what is left
//!
//! The per-site results are then folded into a [`CoordinationSummary`].
//!
//! # Example
//!
//! ```
//! use coordsweep::analysis::{Analyzer, ClassifierConfig, Element, NeighborQuery, SpeciesGroup};
//! use coordsweep::structure::{Lattice, Structure};
//!
//! let structure = Structure::from_fractional(
//!     Lattice::orthorhombic(10.0, 10.0, 10.0).unwrap(),
//!     vec![("Ti", [0.0, 0.0, 0.0]), ("O", [0.2, 0.0, 0.0]), ("O", [0.0, 0.3, 0.0])],
//! );
//! let analyzer = Analyzer::new(structure, &ClassifierConfig::default());
//!
//! let record = analyzer.query(&NeighborQuery::new("Ti-O", SpeciesGroup::Ti, Element::O, 4.0, 6));
//! assert_eq!(record.sites[0].distances.len(), 2);
//! assert_eq!(record.summary.mean_neighbor_count, Some(2.0));
//! ```

pub mod query;
pub mod species;

pub use query::{CoordinationRecord, NeighborQuery, SiteCoordination};
pub use species::{classify, ClassifierConfig, Element, SpeciesGroup, SpeciesGroups};

use crate::stats::CoordinationAggregator;
use crate::structure::Structure;

/// Structure plus its species classification
#[derive(Debug, Clone)]
pub struct Analyzer {
    structure: Structure,
    groups: SpeciesGroups,
}

impl Analyzer {
    /// Classify `structure` and keep it for queries
    pub fn new(structure: Structure, classifier: &ClassifierConfig) -> Self {
        let groups = classify(&structure, classifier);
        Self { structure, groups }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn into_structure(self) -> Structure {
        self.structure
    }

    /// Up to `k` nearest `target` distances from site `index`, ascending
    pub fn nearest_distances(
        &self,
        index: usize,
        target: Element,
        radius: f64,
        k: usize,
        min_distance: f64,
    ) -> Vec<f64> {
        let symbol = target.symbol();
        // neighbors() is already sorted by distance
        self.structure
            .neighbors(index, radius)
            .into_iter()
            .filter(|n| n.site.species == symbol && n.distance > min_distance)
            .map(|n| n.distance)
            .take(k)
            .collect()
    }

    /// Run one neighbor query over the whole source group
    pub fn query(&self, query: &NeighborQuery) -> CoordinationRecord {
        let mut aggregator = CoordinationAggregator::new();

        let sites = self
            .groups
            .sites(query.source)
            .iter()
            .map(|&index| {
                let distances = self.nearest_distances(
                    index,
                    query.target,
                    query.radius,
                    query.k,
                    query.min_distance,
                );
                let (local_mean, local_deviation) = aggregator.add_site(&distances);
                let frac = self.structure.sites[index].frac;

                SiteCoordination {
                    site_index: index,
                    coords: [frac.x, frac.y, frac.z],
                    distances,
                    local_mean,
                    local_deviation,
                }
            })
            .collect::<Vec<_>>();

        if aggregator.num_defined_sites() < aggregator.num_sites() {
            log::debug!(
                "{}: {} of {} sites have no neighbors within {} Å",
                query.label,
                aggregator.num_sites() - aggregator.num_defined_sites(),
                aggregator.num_sites(),
                query.radius
            );
        }

        CoordinationRecord {
            coordination: query.coordination(),
            query: query.clone(),
            sites,
            summary: aggregator.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::Lattice;

    /// Ti at the origin with O at 1.8, 2.0, 2.2, 2.4 Å along x/y/z/-x
    fn octahedron() -> Analyzer {
        let structure = Structure::from_fractional(
            Lattice::orthorhombic(20.0, 20.0, 20.0).unwrap(),
            vec![
                ("Ti", [0.0, 0.0, 0.0]),
                ("O", [0.09, 0.0, 0.0]),
                ("O", [0.0, 0.10, 0.0]),
                ("O", [0.0, 0.0, 0.11]),
                ("O", [-0.12, 0.0, 0.0]),
                ("Mn", [0.5, 0.5, 0.5]),
            ],
        );
        Analyzer::new(structure, &ClassifierConfig::default())
    }

    #[test]
    fn test_truncates_to_k_nearest() {
        let analyzer = octahedron();
        let distances = analyzer.nearest_distances(0, Element::O, 3.0, 2, 0.0);

        assert_eq!(distances.len(), 2);
        assert!((distances[0] - 1.8).abs() < 1e-9);
        assert!((distances[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_neighbors_than_k() {
        let analyzer = octahedron();
        let distances = analyzer.nearest_distances(0, Element::O, 2.1, 6, 0.0);

        assert_eq!(distances.len(), 2);
    }

    #[test]
    fn test_min_distance_is_exclusive() {
        let analyzer = octahedron();
        let distances = analyzer.nearest_distances(0, Element::O, 3.0, 6, 1.9);

        assert_eq!(distances.len(), 3);
        assert!(distances.iter().all(|d| *d > 1.9));
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_query_record() {
        let analyzer = octahedron();
        let record = analyzer.query(&NeighborQuery::new("Ti-O", SpeciesGroup::Ti, Element::O, 3.0, 4));

        assert_eq!(record.coordination, "Ti - O");
        assert_eq!(record.sites.len(), 1);

        let site = &record.sites[0];
        assert_eq!(site.site_index, 0);
        assert!((site.local_mean.unwrap() - 2.1).abs() < 1e-9);
        // Population deviation of 1.8, 2.0, 2.2, 2.4
        assert!((site.local_deviation.unwrap() - 0.05f64.sqrt()).abs() < 1e-9);

        assert_eq!(record.summary.global_mean, site.local_mean);
        assert_eq!(record.summary.global_mean_deviation, Some(0.0));
        assert_eq!(record.summary.mean_neighbor_count, Some(4.0));
    }

    #[test]
    fn test_empty_source_group() {
        let analyzer = octahedron();
        let record = analyzer.query(&NeighborQuery::new("Na1-O", SpeciesGroup::Na1, Element::O, 3.0, 6));

        assert!(record.sites.is_empty());
        assert_eq!(record.summary.global_mean, None);
        assert_eq!(record.summary.mean_neighbor_count, None);
        assert!(!record.summary.is_defined());
    }

    #[test]
    fn test_site_without_neighbors() {
        let analyzer = octahedron();
        let record = analyzer.query(&NeighborQuery::new("Mn-O", SpeciesGroup::Mn, Element::O, 4.0, 6));

        assert_eq!(record.sites.len(), 1);
        assert!(record.sites[0].distances.is_empty());
        assert_eq!(record.sites[0].local_mean, None);
        assert_eq!(record.summary.global_mean, None);
        assert_eq!(record.summary.mean_neighbor_count, Some(0.0));
    }

    #[test]
    fn test_default_set_has_nine_unique_labels() {
        let queries = NeighborQuery::default_set();
        let mut labels: Vec<&str> = queries.iter().map(|q| q.label.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();

        assert_eq!(queries.len(), 9);
        assert_eq!(labels.len(), 9);
        assert!(queries.iter().all(|q| q.k >= 1 && q.radius > q.min_distance));
    }
}
