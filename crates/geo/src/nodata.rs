//! Nodata handling for cell buffers that are processed as `f64` and stored in a narrower type.

use num::NumCast;

use crate::{Error, Result};

/// NaN cells are always treated as nodata, regardless of the nodata value of the raster
#[inline]
pub fn is_nodata(value: f64, nodata: Option<f64>) -> bool {
    value.is_nan() || nodata.is_some_and(|nod| value == nod)
}

/// Marks every cell that is nodata in either buffer as `output_nodata` in `data`.
/// Valid cells of `data` are left untouched.
/// Returns the number of nodata cells in the result.
pub fn merge_nodata_masks(
    data: &mut [f64],
    data_nodata: Option<f64>,
    reference: &[f64],
    reference_nodata: Option<f64>,
    output_nodata: f64,
) -> Result<usize> {
    if data.len() != reference.len() {
        return Err(Error::InvalidArgument(format!(
            "Nodata mask size mismatch: {} cells <-> {} reference cells",
            data.len(),
            reference.len()
        )));
    }

    let mut nodata_count = 0;
    for (cell, &reference_cell) in data.iter_mut().zip(reference) {
        if is_nodata(*cell, data_nodata) || is_nodata(reference_cell, reference_nodata) {
            *cell = output_nodata;
            nodata_count += 1;
        }
    }

    Ok(nodata_count)
}

/// Converts the cells to the storage type.
/// Cells that are nodata or that do not fit in the storage type become `nodata`.
/// Integer storage types round to the nearest value.
pub fn cast_cells<T: NumCast + Copy>(data: &[f64], data_nodata: Option<f64>, nodata: T) -> Vec<T> {
    let integral = <T as NumCast>::from(0.5).is_some_and(|half: T| half.to_f64() == Some(0.0));

    data.iter()
        .map(|&v| {
            if is_nodata(v, data_nodata) {
                return nodata;
            }

            let v = if integral { v.round() } else { v };
            NumCast::from(v).unwrap_or(nodata)
        })
        .collect()
}
