//! Align a set of rasters onto the pixel grid of a reference raster.
//!
//! This crate re-exports the workspace crates:
//! * [`geo`]: raster grid model and the GDAL backed raster operations
//! * [`align`]: the alignment coordinator

pub use align;
pub use geo;

pub use align::{AlignOptions, AlignmentCoordinator, AlignmentReport, CandidateInput};

#[cfg(feature = "gdal")]
pub use align::align_all;
