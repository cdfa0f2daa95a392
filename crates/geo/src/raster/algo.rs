//! Raster operations used to bring rasters onto a common grid (warp, clip and snap).

#[cfg(feature = "gdal")]
mod clipsnap;
mod warp;

#[cfg(feature = "gdal")]
pub use clipsnap::{ClipAndSnapOptions, clip_and_snap};

#[cfg(feature = "gdal")]
pub use warp::{reproject_to_grid, resample_to_cell_size, suggested_warp_extent, warp_cli, warp_to_disk_cli};

pub use warp::WarpOptions;
