/// Interpolation used when raster cells have to be recomputed (reprojection or resampling)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ResampleMethod {
    #[default]
    #[strum(to_string = "nearest", serialize = "near")]
    Nearest,
    #[strum(to_string = "bilinear")]
    Bilinear,
    #[strum(to_string = "cubic")]
    Cubic,
}

impl ResampleMethod {
    /// The name of the method as used by the gdalwarp `-r` argument
    pub fn gdal_name(&self) -> &'static str {
        match self {
            ResampleMethod::Nearest => "near",
            ResampleMethod::Bilinear => "bilinear",
            ResampleMethod::Cubic => "cubic",
        }
    }
}
