//! Periodic lattice geometry
//!
//! Lattice vectors are stored as the rows of a 3x3 matrix (a, b, c), the
//! convention used by POSCAR files. Fractional coordinates are column
//! vectors, so `cart = Mᵀ · frac`.

use super::error::StructureError;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Smallest cell volume accepted before the lattice is considered degenerate
const MIN_VOLUME: f64 = 1e-10;

/// Periodic simulation cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// Lattice vectors as rows
    matrix: Matrix3<f64>,
    /// Inverse of the transposed matrix (cartesian → fractional)
    inv_transpose: Matrix3<f64>,
}

impl Lattice {
    /// Build a lattice from row vectors
    pub fn new(matrix: Matrix3<f64>) -> Result<Self, StructureError> {
        let volume = matrix.determinant();
        if volume.abs() < MIN_VOLUME {
            return Err(StructureError::SingularLattice(volume));
        }

        let inv_transpose = matrix
            .transpose()
            .try_inverse()
            .ok_or(StructureError::SingularLattice(volume))?;

        Ok(Self {
            matrix,
            inv_transpose,
        })
    }

    /// Build a lattice from three lattice vectors
    pub fn from_vectors(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Result<Self, StructureError> {
        Self::new(Matrix3::new(
            a[0], a[1], a[2],
            b[0], b[1], b[2],
            c[0], c[1], c[2],
        ))
    }

    /// Orthorhombic cell with edge lengths along x, y, z
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<Self, StructureError> {
        Self::from_vectors([a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c])
    }

    /// Lattice vector `i` (0 = a, 1 = b, 2 = c)
    pub fn vector(&self, i: usize) -> Vector3<f64> {
        self.matrix.row(i).transpose()
    }

    /// Cell volume (always positive)
    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    pub fn to_cartesian(&self, frac: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transpose() * frac
    }

    pub fn to_fractional(&self, cart: &Vector3<f64>) -> Vector3<f64> {
        self.inv_transpose * cart
    }

    /// Distance between opposite faces of the cell for each lattice direction
    ///
    /// Used to bound how many periodic images a radius query has to visit.
    pub fn perpendicular_widths(&self) -> Vector3<f64> {
        let a = self.vector(0);
        let b = self.vector(1);
        let c = self.vector(2);
        let volume = self.volume();

        Vector3::new(
            volume / b.cross(&c).norm(),
            volume / c.cross(&a).norm(),
            volume / a.cross(&b).norm(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthorhombic_conversions() {
        let lattice = Lattice::orthorhombic(2.0, 4.0, 5.0).unwrap();
        let cart = lattice.to_cartesian(&Vector3::new(0.5, 0.25, 0.2));
        assert!((cart - Vector3::new(1.0, 1.0, 1.0)).norm() < 1e-12);

        let frac = lattice.to_fractional(&cart);
        assert!((frac - Vector3::new(0.5, 0.25, 0.2)).norm() < 1e-12);
        assert!((lattice.volume() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_perpendicular_widths_hexagonal() {
        // a = b = 3, gamma = 120 degrees, c = 10
        let lattice = Lattice::from_vectors(
            [3.0, 0.0, 0.0],
            [-1.5, 3.0 * 3f64.sqrt() / 2.0, 0.0],
            [0.0, 0.0, 10.0],
        )
        .unwrap();

        let widths = lattice.perpendicular_widths();
        let expected = 3.0 * 3f64.sqrt() / 2.0;
        assert!((widths.x - expected).abs() < 1e-9);
        assert!((widths.y - expected).abs() < 1e-9);
        assert!((widths.z - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_lattice_rejected() {
        let result = Lattice::from_vectors([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(matches!(result, Err(StructureError::SingularLattice(_))));
    }
}
