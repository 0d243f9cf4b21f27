//! YAML layout manifests for the sizer layout engine.
//!
//! Load a [`Manifest`] with [`Manifest::from_yaml`] or [`Manifest::from_file`],
//! then [`Manifest::build`] it into a [`LayoutTree`](sizer_layout::LayoutTree).

mod error;
mod manifest;

pub use error::ManifestError;
pub use manifest::{CellConfig, ContainerConfig, GridConfig, Manifest};
