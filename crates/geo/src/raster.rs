//! GDAL backed raster access and the raster operations used to align rasters.

pub mod algo;
#[cfg(feature = "gdal")]
pub mod io;

use std::path::Path;

/// Raster file formats that can be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFileFormat {
    Memory,
    GeoTiff,
    Unknown,
}

impl RasterFileFormat {
    pub fn guess_from_path(path: &Path) -> RasterFileFormat {
        let ext = path.extension().map(|ext| ext.to_string_lossy().to_lowercase());

        match ext.as_deref() {
            Some("tif" | "tiff") => RasterFileFormat::GeoTiff,
            _ => RasterFileFormat::Unknown,
        }
    }

    pub fn gdal_driver_name(&self) -> &str {
        match self {
            RasterFileFormat::Memory => "MEM",
            RasterFileFormat::GeoTiff => "GTiff",
            RasterFileFormat::Unknown => "Unknown",
        }
    }

    /// Creation options applied when writing
    pub fn creation_options(&self) -> &'static [&'static str] {
        match self {
            RasterFileFormat::GeoTiff => &["COMPRESS=LZW", "TILED=YES"],
            RasterFileFormat::Memory | RasterFileFormat::Unknown => &[],
        }
    }
}
