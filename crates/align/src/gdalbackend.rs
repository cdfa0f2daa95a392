use std::path::Path;

use geo::{
    ArrayDataType, CellSize, RasterGrid, ResampleMethod,
    raster::{algo, io},
};

use crate::{AlignOptions, AlignmentBackend, AlignmentCoordinator, AlignmentReport, CandidateInput, Result};

/// Performs the raster operations with GDAL
#[derive(Debug, Clone, Copy, Default)]
pub struct GdalBackend;

impl AlignmentBackend for GdalBackend {
    fn read_grid(&self, path: &Path) -> Result<RasterGrid> {
        Ok(io::read_raster_grid(path)?)
    }

    fn reproject(&self, src: &Path, dst: &Path, target: &RasterGrid, method: ResampleMethod) -> Result<()> {
        Ok(algo::reproject_to_grid(src, dst, target, method)?)
    }

    fn resample(&self, src: &Path, dst: &Path, cell_size: CellSize, method: ResampleMethod, snap: &RasterGrid) -> Result<()> {
        Ok(algo::resample_to_cell_size(src, dst, cell_size, method, snap)?)
    }

    fn reconcile(
        &self,
        reference: &Path,
        src: &Path,
        dst: &Path,
        data_type: Option<ArrayDataType>,
        nodata: Option<f64>,
    ) -> Result<RasterGrid> {
        let opts = algo::ClipAndSnapOptions { data_type, nodata };
        Ok(algo::clip_and_snap(reference, src, dst, &opts)?)
    }
}

/// Aligns the candidate rasters onto the grid of the reference raster using GDAL.
/// The aligned rasters are written to `output_dir` as `<name>_matched.<ext>`.
pub fn align_all(
    reference: &Path,
    candidates: impl Into<CandidateInput>,
    output_dir: &Path,
    options: &AlignOptions,
) -> Result<AlignmentReport> {
    AlignmentCoordinator::new(&GdalBackend, options.clone()).align_all(reference, candidates, output_dir)
}
