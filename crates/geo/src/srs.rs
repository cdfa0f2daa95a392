use crate::Result;

/// The canonical name of the projection (e.g. "WGS 84 / UTM zone 11N").
/// Rasters without projection information have an empty name.
pub fn projection_name(projection: &str) -> Result<String> {
    if projection.trim().is_empty() {
        return Ok(String::new());
    }

    Ok(gdal::spatial_ref::SpatialRef::from_wkt(projection)?.name()?)
}

/// The WKT definition of an EPSG projection
pub fn projection_from_epsg(epsg: u32) -> Result<String> {
    Ok(gdal::spatial_ref::SpatialRef::from_epsg(epsg)?.to_wkt()?)
}
