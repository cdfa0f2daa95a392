//! Reading and writing single band rasters using the GDAL library.
//! Cell values are exchanged as `f64` buffers, the storage type is only relevant when writing.

use std::path::{Path, PathBuf};

use gdal::{errors::GdalError, raster::GdalType};

use crate::{
    ArrayDataType, Error, RasterGrid, RasterSize, Result,
    gdalinterop::create_output_directory_if_needed,
    nodata::{self},
    raster::RasterFileFormat,
    srs,
};

/// Reads the geometry of the raster without reading the cell data
pub fn read_raster_grid(path: impl AsRef<Path>) -> Result<RasterGrid> {
    read_dataset_grid(&open_dataset_read_only(path)?)
}

/// Reads the first band of the raster as `f64` cells together with its geometry
pub fn read_raster_band(path: impl AsRef<Path>) -> Result<(Vec<f64>, RasterGrid)> {
    let ds = open_dataset_read_only(path)?;
    let grid = read_dataset_grid(&ds)?;
    let data = read_dataset_band(&ds)?;
    Ok((data, grid))
}

/// Writes the cells in the requested storage type, cells that can not be represented are stored as nodata.
/// The nodata value of the grid is ignored, `nodata` is used instead.
pub fn write_raster_band_as(
    path: impl AsRef<Path>,
    grid: &RasterGrid,
    data: &[f64],
    data_type: ArrayDataType,
    nodata: f64,
) -> Result<()> {
    let path = path.as_ref();
    if data.len() != grid.size().cell_count() {
        return Err(Error::InvalidArgument(format!(
            "Invalid data buffer provided: incorrect size (got {} cells but grid {} requires {} cells)",
            data.len(),
            grid.size(),
            grid.size().cell_count()
        )));
    }

    if !data_type.fits(nodata) {
        return Err(Error::InvalidArgument(format!(
            "Nodata value {nodata} can not be stored in a {data_type} raster"
        )));
    }

    match data_type {
        ArrayDataType::Uint8 => write_band::<u8>(path, grid, data, nodata),
        ArrayDataType::Int16 => write_band::<i16>(path, grid, data, nodata),
        ArrayDataType::Uint16 => write_band::<u16>(path, grid, data, nodata),
        ArrayDataType::Int32 => write_band::<i32>(path, grid, data, nodata),
        ArrayDataType::Uint32 => write_band::<u32>(path, grid, data, nodata),
        ArrayDataType::Float32 => write_band::<f32>(path, grid, data, nodata),
        ArrayDataType::Float64 => write_band::<f64>(path, grid, data, nodata),
    }
}

/// Detect the storage type of the first raster band
pub fn detect_data_type(path: impl AsRef<Path>) -> Result<ArrayDataType> {
    let ds = open_dataset_read_only(path)?;
    data_type_from_gdal(ds.rasterband(1)?.band_type())
}

/// Open a GDAL raster dataset for reading
pub fn open_dataset_read_only(path: impl AsRef<Path>) -> Result<gdal::Dataset> {
    let path = path.as_ref();
    let options = gdal::DatasetOptions {
        open_flags: gdal::GdalOpenFlags::GDAL_OF_READONLY | gdal::GdalOpenFlags::GDAL_OF_RASTER,
        ..Default::default()
    };

    gdal::Dataset::open_ex(path, options).map_err(|err| match err {
        // Match on the error to give a cleaner error message when the file does not exist
        GdalError::NullPointer { method_name: _, msg: _ } => {
            if !path.exists() {
                Error::InvalidPath(PathBuf::from(path))
            } else {
                Error::Runtime(format!(
                    "Failed to open raster dataset ({}), check file correctness or driver configuration ({})",
                    path.to_string_lossy(),
                    err
                ))
            }
        }
        _ => Error::Runtime(format!("Failed to open raster dataset: {} ({})", path.to_string_lossy(), err)),
    })
}

/// Reads the [`RasterGrid`] of the first band of a dataset
pub fn read_dataset_grid(ds: &gdal::Dataset) -> Result<RasterGrid> {
    let rasterband = ds.rasterband(1)?;
    let projection = ds.projection();
    let projection_name = srs::projection_name(&projection)?;

    let (width, height) = ds.raster_size();
    Ok(RasterGrid::new(
        projection,
        projection_name,
        RasterSize::with_rows_cols(height, width),
        ds.geo_transform()?.into(),
        rasterband.no_data_value(),
    ))
}

pub fn read_dataset_band(ds: &gdal::Dataset) -> Result<Vec<f64>> {
    let band = ds.rasterband(1)?;
    let buffer = band.read_as::<f64>((0, 0), band.size(), band.size(), None)?;
    let (_shape, data) = buffer.into_shape_and_vec();
    Ok(data)
}

/// Creates an in-memory single band `f64` dataset with the geometry of the grid, all cells are initialized to nodata
pub fn create_in_memory_dataset(grid: &RasterGrid, nodata: f64) -> Result<gdal::Dataset> {
    let mem_driver = gdal::DriverManager::get_driver_by_name(RasterFileFormat::Memory.gdal_driver_name())?;
    let mut ds = mem_driver.create_with_band_type::<f64, _>("in_mem", grid.columns(), grid.rows(), 1)?;
    ds.set_geo_transform(&grid.geo_transform().into())?;
    ds.set_projection(grid.projection())?;

    let mut band = ds.rasterband(1)?;
    band.set_no_data_value(Some(nodata))?;
    band.fill(nodata, None)?;
    Ok(ds)
}

pub fn data_type_from_gdal(data_type: gdal::raster::GdalDataType) -> Result<ArrayDataType> {
    use gdal::raster::GdalDataType;

    Ok(match data_type {
        GdalDataType::UInt8 => ArrayDataType::Uint8,
        GdalDataType::Int16 => ArrayDataType::Int16,
        GdalDataType::UInt16 => ArrayDataType::Uint16,
        GdalDataType::Int32 => ArrayDataType::Int32,
        GdalDataType::UInt32 => ArrayDataType::Uint32,
        GdalDataType::Float32 => ArrayDataType::Float32,
        GdalDataType::Float64 => ArrayDataType::Float64,
        _ => {
            return Err(Error::Runtime(format!("Unsupported raster data type: {data_type}")));
        }
    })
}

fn create_raster_driver_for_path(path: &Path) -> Result<(gdal::Driver, RasterFileFormat)> {
    let raster_format = RasterFileFormat::guess_from_path(path);
    if raster_format == RasterFileFormat::Unknown {
        return Err(Error::Runtime(format!(
            "Could not detect raster type from filename: {}",
            path.to_string_lossy()
        )));
    }

    Ok((gdal::DriverManager::get_driver_by_name(raster_format.gdal_driver_name())?, raster_format))
}

fn write_band<T: GdalType + num::NumCast + Copy>(path: &Path, grid: &RasterGrid, data: &[f64], nodata: f64) -> Result<()> {
    let (driver, raster_format) = create_raster_driver_for_path(path)?;
    create_output_directory_if_needed(path)?;

    let storage_nodata: T = num::cast(nodata).ok_or_else(|| Error::InvalidArgument(format!("Invalid nodata value: {nodata}")))?;
    let cells = nodata::cast_cells(data, grid.nodata(), storage_nodata);

    let options = gdal::raster::RasterCreationOptions::from_iter(raster_format.creation_options().iter().copied());
    let mut ds = driver.create_with_band_type_with_options::<T, _>(path, grid.columns(), grid.rows(), 1, &options)?;
    ds.set_geo_transform(&grid.geo_transform().into())?;
    ds.set_projection(grid.projection())?;

    let mut band = ds.rasterband(1)?;
    band.set_no_data_value(Some(nodata))?;
    let mut buffer = gdal::raster::Buffer::new((grid.columns(), grid.rows()), cells);
    band.write((0, 0), (grid.columns(), grid.rows()), &mut buffer)?;
    ds.flush_cache()?;
    Ok(())
}
