//! POSCAR/CONTCAR loading through `vasp_poscar`
//!
//! The crate handles the file format (scale line, selective dynamics,
//! Direct/Cartesian blocks); this module only maps a parsed `Poscar` onto a
//! [`Structure`]. VASP 4 files without a species line take their species
//! from the comment line.

use super::{Lattice, Site, Structure, StructureError};
use nalgebra::Vector3;
use std::path::Path;
use vasp_poscar::Poscar;

/// Read a structure from a POSCAR/CONTCAR file
pub fn read_file(path: &Path) -> Result<Structure, StructureError> {
    let poscar = Poscar::from_path(path).map_err(|err| StructureError::Poscar {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    from_poscar(&poscar)
}

/// Convert a parsed POSCAR into a structure
pub fn from_poscar(poscar: &Poscar) -> Result<Structure, StructureError> {
    let [a, b, c] = poscar.scaled_lattice_vectors();
    let lattice = Lattice::from_vectors(a, b, c)?;

    let species: Vec<String> = match poscar.group_symbols() {
        Some(symbols) => symbols.map(normalize_species).collect(),
        None => poscar.comment().split_whitespace().map(normalize_species).collect(),
    };
    let counts: Vec<usize> = poscar.group_counts().collect();

    if species.len() != counts.len() {
        return Err(StructureError::Species(format!(
            "{} species names but {} counts",
            species.len(),
            counts.len()
        )));
    }

    let labels = species
        .iter()
        .zip(&counts)
        .flat_map(|(name, &count)| std::iter::repeat(name).take(count));

    let sites = labels
        .zip(poscar.scaled_cart_positions().iter().copied())
        .map(|(name, position)| {
            let cart = Vector3::from(position);
            Site {
                species: name.clone(),
                frac: lattice.to_fractional(&cart),
                cart,
            }
        })
        .collect();

    Ok(Structure { lattice, sites })
}

/// Strip POTCAR decorations such as `Na_pv` or `Mn/1a2b3c`
fn normalize_species(token: &str) -> String {
    token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}
