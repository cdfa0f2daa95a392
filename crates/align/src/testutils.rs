use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use geo::{ArrayDataType, CellSize, Point, RasterGrid, RasterSize, ResampleMethod};

use crate::{AlignmentBackend, Error, Result};

pub const UTM: &str = "WGS 84 / UTM zone 11N";
pub const LATLON: &str = "WGS 84";

pub fn utm_grid(lower_left: Point, size: RasterSize, cell_size: CellSize) -> RasterGrid {
    RasterGrid::with_origin("", UTM, size, lower_left, cell_size, Some(-9999.0))
}

pub fn latlon_grid(lower_left: Point, size: RasterSize, cell_size: f64) -> RasterGrid {
    RasterGrid::with_origin("", LATLON, size, lower_left, CellSize::square(cell_size), None)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reproject {
        src: PathBuf,
        dst: PathBuf,
        method: ResampleMethod,
    },
    Resample {
        src: PathBuf,
        dst: PathBuf,
        cell_size: CellSize,
        method: ResampleMethod,
    },
    Reconcile {
        src: PathBuf,
        dst: PathBuf,
        data_type: Option<ArrayDataType>,
        nodata: Option<f64>,
    },
}

/// Keeps the raster grids in memory, the files on disk are empty placeholders
#[derive(Default)]
pub struct FakeBackend {
    grids: Mutex<HashMap<PathBuf, RasterGrid>>,
    calls: Mutex<Vec<Call>>,
    reconcile_delay: Duration,
}

impl FakeBackend {
    /// Every reconcile call takes at least `delay`
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub fn with_reconcile_delay(delay: Duration) -> Self {
        FakeBackend {
            reconcile_delay: delay,
            ..Default::default()
        }
    }

    pub fn add_raster(&self, path: &Path, grid: RasterGrid) {
        std::fs::write(path, []).expect("Failed to create raster placeholder");
        self.grids.lock().expect("poisoned").insert(path.to_path_buf(), grid);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("poisoned").push(call);
    }

    fn store(&self, path: &Path, grid: RasterGrid) -> Result<()> {
        std::fs::write(path, [])?;
        self.grids.lock().expect("poisoned").insert(path.to_path_buf(), grid);
        Ok(())
    }
}

impl AlignmentBackend for FakeBackend {
    fn read_grid(&self, path: &Path) -> Result<RasterGrid> {
        self.grids
            .lock()
            .expect("poisoned")
            .get(path)
            .cloned()
            .ok_or_else(|| Error::Geo(geo::Error::InvalidPath(path.to_path_buf())))
    }

    fn reproject(&self, src: &Path, dst: &Path, target: &RasterGrid, method: ResampleMethod) -> Result<()> {
        let src_grid = self.read_grid(src)?;
        self.record(Call::Reproject {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            method,
        });

        // the coordinates are not transformed, only the lattice of the target is taken over
        let extent = target.snap_extent(&src_grid.bounding_box());
        let grid = RasterGrid::covering_extent(target.projection(), target.projection_name(), &extent, target.cell_size());
        self.store(dst, grid)
    }

    fn resample(&self, src: &Path, dst: &Path, cell_size: CellSize, method: ResampleMethod, snap: &RasterGrid) -> Result<()> {
        let src_grid = self.read_grid(src)?;
        self.record(Call::Resample {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            cell_size,
            method,
        });

        let extent = snap.with_cell_size(cell_size).snap_extent(&src_grid.bounding_box());
        let grid = RasterGrid::covering_extent(src_grid.projection(), src_grid.projection_name(), &extent, cell_size);
        self.store(dst, grid)
    }

    fn reconcile(
        &self,
        reference: &Path,
        src: &Path,
        dst: &Path,
        data_type: Option<ArrayDataType>,
        nodata: Option<f64>,
    ) -> Result<RasterGrid> {
        let src_grid = self.read_grid(src)?;
        self.record(Call::Reconcile {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
            data_type,
            nodata,
        });

        std::thread::sleep(self.reconcile_delay);

        let mut grid = self.read_grid(reference)?;
        grid.set_nodata(nodata.or(src_grid.nodata()).or(Some(-9999.0)));
        self.store(dst, grid.clone())?;
        Ok(grid)
    }
}
