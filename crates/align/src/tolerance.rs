//! Cell size comparison with a fixed decimal tolerance.

/// Ratios that round to 1 at 5 decimals are considered equal
pub const CELL_SIZE_RATIO_EPSILON: f64 = 0.5e-5;

/// Checks if `reference / candidate` equals 1 within [`CELL_SIZE_RATIO_EPSILON`].
/// Zero or non finite cell sizes never compare equal.
pub fn cell_size_ratio_is_unity(reference: f64, candidate: f64) -> bool {
    let ratio = reference / candidate;
    if !ratio.is_finite() || ratio == 0.0 {
        return false;
    }

    approx::abs_diff_eq!(ratio, 1.0, epsilon = CELL_SIZE_RATIO_EPSILON)
}
