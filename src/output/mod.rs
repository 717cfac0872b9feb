//! Output module
//!
//! Dataset serialization, the JSON sweep manifest and console summaries.

pub mod dataset;
pub mod json;
pub mod text;

pub use dataset::{read_dataset, write_dataset};
pub use json::{manifest_path, write_manifest, SweepManifest};
