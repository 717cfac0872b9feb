//! Periodic crystal structures
//!
//! A minimal structure model: a [`Lattice`], an immutable list of [`Site`]s and
//! a periodic radius query that returns every image of every site within a
//! cutoff. Structures are read from VASP POSCAR/CONTCAR files (see [`poscar`]).
//!
//! # Example
//!
//! ```
//! use coordsweep::structure::{Lattice, Structure};
//!
//! let lattice = Lattice::orthorhombic(4.0, 4.0, 4.0).unwrap();
//! let structure = Structure::from_fractional(
//!     lattice,
//!     vec![("Na", [0.0, 0.0, 0.0]), ("O", [0.5, 0.0, 0.0])],
//! );
//!
//! let neighbors = structure.neighbors(0, 2.5);
//! assert_eq!(neighbors.len(), 2); // O at +2 Å and its image at -2 Å
//! assert!(neighbors.iter().all(|n| n.site.species == "O"));
//! ```

pub mod error;
pub mod lattice;
pub mod poscar;

pub use error::StructureError;
pub use lattice::Lattice;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Atomic site with its species label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Element label (e.g. "Na")
    pub species: String,
    /// Fractional coordinates
    pub frac: Vector3<f64>,
    /// Cartesian coordinates in Å
    pub cart: Vector3<f64>,
}

/// A periodic image of a site found by a radius query
#[derive(Debug, Clone)]
pub struct Neighbor<'a> {
    /// Site the image belongs to
    pub site: &'a Site,
    /// Index of that site in the structure
    pub index: usize,
    /// Distance from the query site in Å
    pub distance: f64,
    /// Lattice translation of the image, relative to the wrapped difference vector
    pub image: [i32; 3],
}

/// Crystal structure: lattice plus sites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub lattice: Lattice,
    pub sites: Vec<Site>,
}

impl Structure {
    /// Create a structure from fractional coordinates
    pub fn from_fractional<S: Into<String>>(lattice: Lattice, sites: Vec<(S, [f64; 3])>) -> Self {
        let sites = sites
            .into_iter()
            .map(|(species, frac)| {
                let frac = Vector3::from(frac);
                Site {
                    species: species.into(),
                    cart: lattice.to_cartesian(&frac),
                    frac,
                }
            })
            .collect();

        Self { lattice, sites }
    }

    /// Read a structure from a POSCAR/CONTCAR file
    pub fn from_file(path: &Path) -> Result<Self, StructureError> {
        poscar::read_file(path)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Chemical formula in order of first appearance, e.g. `Na2TiMnP2O4`
    pub fn formula(&self) -> String {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for site in &self.sites {
            match counts.iter_mut().find(|(species, _)| *species == site.species) {
                Some((_, count)) => *count += 1,
                None => counts.push((site.species.as_str(), 1)),
            }
        }

        counts
            .into_iter()
            .map(|(species, count)| {
                if count == 1 {
                    species.to_string()
                } else {
                    format!("{}{}", species, count)
                }
            })
            .collect()
    }

    /// All periodic images within `radius` of site `center`
    ///
    /// The query site itself (zero translation) is excluded; its own periodic
    /// images are not. Results are sorted by ascending distance.
    ///
    /// # Panics
    ///
    /// Panics if `center` is out of bounds.
    pub fn neighbors(&self, center: usize, radius: f64) -> Vec<Neighbor<'_>> {
        let origin = &self.sites[center];
        let widths = self.lattice.perpendicular_widths();

        // Difference vectors are wrapped into [-0.5, 0.5], so one extra image
        // per direction covers the rest of the sphere.
        let reach = [
            (radius / widths.x).ceil() as i32 + 1,
            (radius / widths.y).ceil() as i32 + 1,
            (radius / widths.z).ceil() as i32 + 1,
        ];
        let radius_sq = radius * radius;

        let mut found = Vec::new();
        for (index, site) in self.sites.iter().enumerate() {
            let mut delta = site.frac - origin.frac;
            delta.apply(|x| *x -= x.round());

            for i in -reach[0]..=reach[0] {
                for j in -reach[1]..=reach[1] {
                    for k in -reach[2]..=reach[2] {
                        if index == center && i == 0 && j == 0 && k == 0 {
                            continue;
                        }

                        let shifted = delta + Vector3::new(i as f64, j as f64, k as f64);
                        let dist_sq = self.lattice.to_cartesian(&shifted).norm_squared();
                        if dist_sq <= radius_sq {
                            found.push(Neighbor {
                                site,
                                index,
                                distance: dist_sq.sqrt(),
                                image: [i, j, k],
                            });
                        }
                    }
                }
            }
        }

        found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_cubic(a: f64) -> Structure {
        Structure::from_fractional(
            Lattice::orthorhombic(a, a, a).unwrap(),
            vec![("Mn", [0.0, 0.0, 0.0])],
        )
    }

    #[test]
    fn test_self_images_counted() {
        // Simple cubic: 6 nearest images at a, 12 at a*sqrt(2)
        let structure = simple_cubic(3.0);

        let first_shell = structure.neighbors(0, 3.01);
        assert_eq!(first_shell.len(), 6);
        assert!(first_shell.iter().all(|n| (n.distance - 3.0).abs() < 1e-9));

        let second_shell = structure.neighbors(0, 4.3);
        assert_eq!(second_shell.len(), 18);
    }

    #[test]
    fn test_radius_larger_than_cell() {
        // 2 Å cell, 4.01 Å radius needs images two cells away
        let structure = simple_cubic(2.0);
        let neighbors = structure.neighbors(0, 4.01);

        assert!(neighbors.iter().any(|n| n.image == [2, 0, 0]));
        assert!(neighbors.iter().all(|n| n.distance <= 4.01));
        // Sphere of radius 2 in the integer lattice (excluding origin)
        assert_eq!(neighbors.len(), 32);
    }

    #[test]
    fn test_neighbors_sorted_and_wrapped() {
        let structure = Structure::from_fractional(
            Lattice::orthorhombic(10.0, 10.0, 10.0).unwrap(),
            vec![
                ("Na", [0.05, 0.5, 0.5]),
                ("O", [0.95, 0.5, 0.5]),
                ("O", [0.30, 0.5, 0.5]),
            ],
        );

        let neighbors = structure.neighbors(0, 3.0);
        let distances: Vec<f64> = neighbors.iter().map(|n| n.distance).collect();

        assert_eq!(distances.len(), 2);
        assert!((distances[0] - 1.0).abs() < 1e-9); // across the boundary
        assert!((distances[1] - 2.5).abs() < 1e-9);
        assert_eq!(neighbors[0].index, 1);
    }

    #[test]
    fn test_formula() {
        let structure = Structure::from_fractional(
            Lattice::orthorhombic(5.0, 5.0, 5.0).unwrap(),
            vec![
                ("Na", [0.0, 0.0, 0.0]),
                ("Na", [0.5, 0.0, 0.0]),
                ("Ti", [0.0, 0.5, 0.0]),
                ("O", [0.0, 0.0, 0.5]),
                ("O", [0.5, 0.5, 0.5]),
            ],
        );

        assert_eq!(structure.formula(), "Na2TiO2");
    }
}
