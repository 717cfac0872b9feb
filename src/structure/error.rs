use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("failed to read structure file {path}: {message}")]
    Poscar { path: PathBuf, message: String },

    #[error("species labels do not match the site counts: {0}")]
    Species(String),

    #[error("lattice vectors are degenerate (volume {0:.3e})")]
    SingularLattice(f64),
}
