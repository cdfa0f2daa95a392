/// Numeric cell type of a raster band
/// Signed 8-bit bands need a recent gdal, 64-bit integer bands can not represent their nodata value as `f64`, both are not supported
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[repr(u8)]
pub enum ArrayDataType {
    #[strum(to_string = "uint8", serialize = "byte")]
    Uint8 = 0,
    Int16 = 1,
    Uint16 = 2,
    Int32 = 3,
    Uint32 = 4,
    Float32 = 5,
    Float64 = 6,
}

impl ArrayDataType {
    /// The value used as nodata when no explicit nodata value was requested
    pub fn default_nodata_value(&self) -> f64 {
        match self {
            Self::Uint8 => u8::MAX as f64,
            Self::Int16 => i16::MIN as f64,
            Self::Uint16 => u16::MAX as f64,
            Self::Int32 => i32::MIN as f64,
            Self::Uint32 => u32::MAX as f64,
            Self::Float32 | Self::Float64 => -9999.0,
        }
    }

    pub fn is_floating_point(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Checks if the value can be stored in this type without loss of range
    pub fn fits(&self, value: f64) -> bool {
        if value.is_nan() {
            return self.is_floating_point();
        }

        match self {
            Self::Uint8 => num::cast::<f64, u8>(value).is_some(),
            Self::Int16 => num::cast::<f64, i16>(value).is_some(),
            Self::Uint16 => num::cast::<f64, u16>(value).is_some(),
            Self::Int32 => num::cast::<f64, i32>(value).is_some(),
            Self::Uint32 => num::cast::<f64, u32>(value).is_some(),
            Self::Float32 => value.is_infinite() || num::cast::<f64, f32>(value).is_some_and(|v| v.is_finite()),
            Self::Float64 => true,
        }
    }
}
