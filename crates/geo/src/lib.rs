#![warn(clippy::unwrap_used)]

pub type Result<T = ()> = std::result::Result<T, Error>;

mod arraydatatype;
mod cellsize;
mod error;
#[cfg(feature = "gdal")]
pub mod gdalinterop;
mod geotransform;
pub mod nodata;
pub mod raster;
mod rastergrid;
mod rastersize;
pub mod rect;
mod resample;
#[cfg(feature = "gdal")]
mod runtimeconfiguration;
#[cfg(feature = "gdal")]
pub mod srs;

#[doc(inline)]
pub use arraydatatype::ArrayDataType;
#[doc(inline)]
pub use cellsize::CellSize;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use geotransform::GeoTransform;
#[doc(inline)]
pub use rastergrid::RasterGrid;
#[doc(inline)]
pub use rastersize::RasterSize;
#[doc(inline)]
pub use rect::Rect;
#[doc(inline)]
pub use resample::ResampleMethod;
#[cfg(feature = "gdal")]
pub use runtimeconfiguration::RuntimeConfiguration;

pub type Point<T = f64> = geo_types::Point<T>;
