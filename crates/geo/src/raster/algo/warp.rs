#[cfg(feature = "gdal")]
use std::{
    ffi::{CString, c_int},
    path::Path,
};

use crate::{CellSize, Error, Rect, ResampleMethod, Result};

#[cfg(feature = "gdal")]
use crate::{
    RasterGrid,
    gdalinterop::{self, create_string_list},
    raster::{RasterFileFormat, io},
};

/// Settings for a gdalwarp invocation, translated to the equivalent command line arguments.
#[derive(Debug, Clone, Default)]
pub struct WarpOptions {
    /// Target projection definition (WKT, EPSG:xxxx or proj string)
    pub target_srs: Option<String>,
    /// Target extent in target projection units
    pub target_extent: Option<Rect>,
    pub target_cell_size: Option<CellSize>,
    pub resample_method: ResampleMethod,
    pub target_nodata: Option<f64>,
    /// Initialize the output cells to the target nodata value before warping
    pub init_dest_nodata: bool,
    /// GDAL driver name of the output, derived from the output path when not provided
    pub output_format: Option<String>,
    pub creation_options: Vec<String>,
    /// Process chunks with all available cpus
    pub all_cpus: bool,
}

impl WarpOptions {
    pub fn to_gdalwarp_args(&self) -> Result<Vec<String>> {
        let mut args = vec!["-r".to_string(), self.resample_method.gdal_name().to_string()];

        if let Some(srs) = &self.target_srs {
            args.extend(["-t_srs".to_string(), srs.clone()]);
        }

        if let Some(extent) = &self.target_extent {
            args.extend([
                "-te".to_string(),
                extent.min_x().to_string(),
                extent.min_y().to_string(),
                extent.max_x().to_string(),
                extent.max_y().to_string(),
            ]);
        }

        if let Some(cell_size) = &self.target_cell_size {
            if !cell_size.is_valid() {
                return Err(Error::InvalidArgument(format!("Invalid warp target cell size: {cell_size}")));
            }

            args.extend(["-tr".to_string(), cell_size.width().to_string(), cell_size.height().to_string()]);
        }

        if let Some(nodata) = self.target_nodata {
            args.extend(["-dstnodata".to_string(), nodata.to_string()]);
            if self.init_dest_nodata {
                args.extend(["-wo".to_string(), "INIT_DEST=NO_DATA".to_string()]);
            }
        }

        if let Some(format) = &self.output_format {
            args.extend(["-of".to_string(), format.clone()]);
        }

        for opt in &self.creation_options {
            args.extend(["-co".to_string(), opt.clone()]);
        }

        if self.all_cpus {
            args.extend(["-multi".to_string(), "-wo".to_string(), "NUM_THREADS=ALL_CPUS".to_string()]);
        }

        Ok(args)
    }
}

#[cfg(feature = "gdal")]
struct WarpAppOptionsWrapper {
    options: *mut gdal_sys::GDALWarpAppOptions,
}

#[cfg(feature = "gdal")]
impl WarpAppOptionsWrapper {
    fn new(opts: &[String]) -> Result<Self> {
        let c_opts = create_string_list(opts)?;

        let options = unsafe { gdal_sys::GDALWarpAppOptionsNew(c_opts.as_ptr(), core::ptr::null_mut()) };
        Ok(WarpAppOptionsWrapper {
            options: gdalinterop::check_pointer(options, "GDALWarpAppOptionsNew")?,
        })
    }
}

#[cfg(feature = "gdal")]
impl Drop for WarpAppOptionsWrapper {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALWarpAppOptionsFree(self.options);
        }
    }
}

/// Warps the source dataset into a new raster on disk, equivalent to running `gdalwarp` with the provided arguments
#[cfg(feature = "gdal")]
pub fn warp_to_disk_cli(src_ds: &gdal::Dataset, dest_path: &Path, options: &[String]) -> Result<()> {
    let warp_options = WarpAppOptionsWrapper::new(options)?;

    gdalinterop::create_output_directory_if_needed(dest_path)?;

    let path_str = CString::new(dest_path.to_string_lossy().to_string())?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALWarp(
            path_str.as_ptr(),
            std::ptr::null_mut(),
            1,
            &mut src_ds.c_dataset(),
            warp_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::Runtime("GDAL Warp: invalid arguments".to_string()));
        }

        // Dropping the dataset closes it, which flushes the result to disk
        drop(gdal::Dataset::from_c_dataset(gdalinterop::check_pointer(handle, "GDALWarp")?));
    }

    Ok(())
}

/// Warps the source dataset into an existing dataset, the destination geometry is not modified
#[cfg(feature = "gdal")]
pub fn warp_cli(src_ds: &gdal::Dataset, dst_ds: &mut gdal::Dataset, options: &[String]) -> Result<()> {
    let warp_options = WarpAppOptionsWrapper::new(options)?;

    unsafe {
        let mut user_error: c_int = 0;
        let handle = gdal_sys::GDALWarp(
            std::ptr::null(),
            dst_ds.c_dataset(),
            1,
            &mut src_ds.c_dataset(),
            warp_options.options,
            &mut user_error,
        );

        if user_error != 0 {
            return Err(Error::Runtime("GDAL Warp: invalid arguments".to_string()));
        }

        gdalinterop::check_pointer(handle, "GDALWarp")?;
    }

    Ok(())
}

/// The extent of the source dataset when warped to the target projection
#[cfg(feature = "gdal")]
pub fn suggested_warp_extent(src_ds: &gdal::Dataset, target_projection: &str) -> Result<Rect> {
    if target_projection.is_empty() {
        return Err(Error::InvalidArgument(
            "Cannot compute a warp extent without target projection information".to_string(),
        ));
    }

    // Create a transformer that maps from source pixel/line coordinates
    // to destination georeferenced coordinates (not destination pixel line).
    // We do that by omitting the destination dataset handle (setting it to nullptr).
    unsafe {
        let target_srs = CString::new(target_projection)?;
        let transformer_arg = gdalinterop::check_pointer(
            gdal_sys::GDALCreateGenImgProjTransformer(
                src_ds.c_dataset(),
                std::ptr::null(),
                std::ptr::null_mut(),
                target_srs.as_ptr(),
                gdalinterop::FALSE,
                0.0,
                0,
            ),
            "GDALCreateGenImgProjTransformer",
        )?;

        let mut target_transform: gdal::GeoTransform = [0.0; 6];
        let mut rows: c_int = 0;
        let mut cols: c_int = 0;

        let warp_rc = gdal_sys::GDALSuggestedWarpOutput(
            src_ds.c_dataset(),
            Some(gdal_sys::GDALGenImgProjTransform),
            transformer_arg,
            target_transform.as_mut_ptr(),
            &mut cols,
            &mut rows,
        );

        gdal_sys::GDALDestroyGenImgProjTransformer(transformer_arg);
        gdalinterop::check_rc(warp_rc)?;

        let trans = crate::GeoTransform::new(target_transform);
        Ok(Rect::from_points(trans.apply(0.0, 0.0), trans.apply(cols as f64, rows as f64)))
    }
}

/// Reprojects the source raster to the projection and cell size of the target grid.
/// The output extent covers the complete source raster and its cell edges coincide with the cell edges of the target grid.
#[cfg(feature = "gdal")]
pub fn reproject_to_grid(src: &Path, dst: &Path, target: &RasterGrid, method: ResampleMethod) -> Result<()> {
    let src_ds = io::open_dataset_read_only(src)?;
    let extent = suggested_warp_extent(&src_ds, target.projection())?;

    let opts = WarpOptions {
        target_srs: Some(target.projection().to_string()),
        target_extent: Some(target.snap_extent(&extent)),
        target_cell_size: Some(target.cell_size()),
        resample_method: method,
        ..output_options(&src_ds, dst)?
    };

    let args = opts.to_gdalwarp_args()?;
    log::debug!("Reproject {} -> {}: gdalwarp {}", src.display(), dst.display(), args.join(" "));
    warp_to_disk_cli(&src_ds, dst, &args)?;
    check_output_lattice(dst, target)
}

/// Resamples the source raster to the cell size without changing its projection.
/// The output extent covers the complete source raster and is aligned to the cell edges of the snap grid.
#[cfg(feature = "gdal")]
pub fn resample_to_cell_size(src: &Path, dst: &Path, cell_size: CellSize, method: ResampleMethod, snap: &RasterGrid) -> Result<()> {
    let src_ds = io::open_dataset_read_only(src)?;
    let src_grid = io::read_dataset_grid(&src_ds)?;

    let snap_to = snap.with_cell_size(cell_size);
    let opts = WarpOptions {
        target_extent: Some(snap_to.snap_extent(&src_grid.bounding_box())),
        target_cell_size: Some(cell_size),
        resample_method: method,
        ..output_options(&src_ds, dst)?
    };

    let args = opts.to_gdalwarp_args()?;
    log::debug!("Resample {} -> {}: gdalwarp {}", src.display(), dst.display(), args.join(" "));
    warp_to_disk_cli(&src_ds, dst, &args)?;
    check_output_lattice(dst, &snap_to)
}

/// Output settings shared by the intermediate warps.
/// Cells without source coverage are nodata: the source nodata value, or the default of the source type when the source has none.
#[cfg(feature = "gdal")]
fn output_options(src_ds: &gdal::Dataset, dst: &Path) -> Result<WarpOptions> {
    let format = match RasterFileFormat::guess_from_path(dst) {
        RasterFileFormat::Unknown => RasterFileFormat::GeoTiff,
        format => format,
    };

    let band = src_ds.rasterband(1)?;
    let nodata = match band.no_data_value() {
        Some(nodata) if !nodata.is_nan() => nodata,
        _ => io::data_type_from_gdal(band.band_type())?.default_nodata_value(),
    };

    Ok(WarpOptions {
        target_nodata: Some(nodata),
        init_dest_nodata: true,
        output_format: Some(format.gdal_driver_name().to_string()),
        creation_options: format.creation_options().iter().map(|opt| opt.to_string()).collect(),
        all_cpus: true,
        ..Default::default()
    })
}

#[cfg(feature = "gdal")]
fn check_output_lattice(dst: &Path, expected: &RasterGrid) -> Result<()> {
    let grid = io::read_raster_grid(dst)?;
    if !grid.is_aligned_with(expected) {
        log::warn!(
            "Cell edges of {} do not coincide with the snap grid (origin {:?}, cell size {})",
            dst.display(),
            grid.top_left(),
            grid.cell_size()
        );
    }

    Ok(())
}
