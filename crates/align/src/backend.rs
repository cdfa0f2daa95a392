use std::path::Path;

use geo::{ArrayDataType, CellSize, RasterGrid, ResampleMethod};

use crate::Result;

/// The raster operations the coordinator builds on.
/// Implementations are used concurrently from multiple threads, but never on the same output path.
pub trait AlignmentBackend: Sync {
    /// Reads the grid of the raster without the cell data
    fn read_grid(&self, path: &Path) -> Result<RasterGrid>;

    /// Writes `src` in the projection and cell size of `target` to `dst`, with cell edges on the lattice of `target`
    fn reproject(&self, src: &Path, dst: &Path, target: &RasterGrid, method: ResampleMethod) -> Result<()>;

    /// Writes `src` with the requested cell size to `dst` without changing the projection
    fn resample(&self, src: &Path, dst: &Path, cell_size: CellSize, method: ResampleMethod, snap: &RasterGrid) -> Result<()>;

    /// Writes `src` on the exact grid of `reference` to `dst` and applies the nodata mask of the reference.
    /// Returns the grid of the written raster.
    fn reconcile(
        &self,
        reference: &Path,
        src: &Path,
        dst: &Path,
        data_type: Option<ArrayDataType>,
        nodata: Option<f64>,
    ) -> Result<RasterGrid>;
}
