use std::path::Path;

use crate::{
    ArrayDataType, Error, RasterGrid, ResampleMethod, Result,
    nodata,
    raster::{algo::WarpOptions, io},
};

use super::warp::warp_cli;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClipAndSnapOptions {
    /// Storage type of the output, the type of the source raster when not provided
    pub data_type: Option<ArrayDataType>,
    /// Nodata value of the output.
    /// When not provided the nodata value of the source is used if it fits the output type, the type default otherwise.
    pub nodata: Option<f64>,
}

/// Writes the source raster on the exact grid of the reference raster (origin, cell size and dimensions).
/// Cells outside of the source extent and cells that are nodata in the reference become nodata.
/// Returns the grid of the written raster.
pub fn clip_and_snap(reference: &Path, src: &Path, dst: &Path, opts: &ClipAndSnapOptions) -> Result<RasterGrid> {
    let (reference_data, reference_grid) = io::read_raster_band(reference)?;

    let src_ds = io::open_dataset_read_only(src)?;
    let src_grid = io::read_dataset_grid(&src_ds)?;
    let data_type = match opts.data_type {
        Some(data_type) => data_type,
        None => io::data_type_from_gdal(src_ds.rasterband(1)?.band_type())?,
    };

    let output_nodata = output_nodata_value(data_type, opts.nodata, src_grid.nodata())?;

    let mut dst_ds = io::create_in_memory_dataset(&reference_grid, output_nodata)?;
    let warp_opts = WarpOptions {
        resample_method: ResampleMethod::Nearest,
        target_nodata: Some(output_nodata),
        ..Default::default()
    };
    warp_cli(&src_ds, &mut dst_ds, &warp_opts.to_gdalwarp_args()?)?;

    let mut data = io::read_dataset_band(&dst_ds)?;
    let nodata_count = nodata::merge_nodata_masks(
        &mut data,
        Some(output_nodata),
        &reference_data,
        reference_grid.nodata(),
        output_nodata,
    )?;

    log::debug!(
        "Clip and snap {} -> {}: {data_type}, nodata {output_nodata} ({nodata_count} nodata cells)",
        src.display(),
        dst.display()
    );

    let mut output_grid = reference_grid;
    output_grid.set_nodata(Some(output_nodata));
    io::write_raster_band_as(dst, &output_grid, &data, data_type, output_nodata)?;

    Ok(output_grid)
}

fn output_nodata_value(data_type: ArrayDataType, requested: Option<f64>, source: Option<f64>) -> Result<f64> {
    if let Some(nodata) = requested {
        if !data_type.fits(nodata) {
            return Err(Error::InvalidArgument(format!(
                "Nodata value {nodata} can not be stored in a {data_type} raster"
            )));
        }

        return Ok(nodata);
    }

    Ok(match source {
        Some(nodata) if !nodata.is_nan() && data_type.fits(nodata) => nodata,
        _ => data_type.default_nodata_value(),
    })
}
