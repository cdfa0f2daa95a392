//! Spatial alignment of rasters onto the pixel grid of a reference ("snap") raster.
//!
//! Every candidate raster is compared with the reference grid and only the corrections it needs are applied:
//! * reprojection when the projection differs
//! * resampling when the resolution differs
//!
//! The result is always clipped and snapped onto the exact grid of the reference.

#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod backend;
mod coordinator;
mod error;
#[cfg(feature = "gdal")]
mod gdalbackend;
pub mod inputs;
mod plan;
pub mod tolerance;
mod workspace;

#[cfg(test)]
mod testutils;

pub use backend::AlignmentBackend;
pub use coordinator::{
    AlignOptions, AlignedRaster, AlignmentCoordinator, AlignmentReport, FailedRaster, FailurePolicy, OUTPUT_QUALIFIER,
};
#[doc(inline)]
pub use error::Error;
#[cfg(feature = "gdal")]
pub use gdalbackend::{GdalBackend, align_all};
pub use inputs::CandidateInput;
pub use plan::{AlignmentPlan, AxisStrictness};
