use geo::RasterGrid;

use crate::tolerance::cell_size_ratio_is_unity;

/// Decides when a candidate counts as having a different resolution than the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum AxisStrictness {
    /// Both the cell height and the cell width must differ
    #[default]
    Both,
    /// A difference on a single axis is sufficient
    Any,
}

/// The corrections a candidate needs before it can be snapped onto the reference grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentPlan {
    pub needs_reprojection: bool,
    /// Reprojection already produces the reference cell size, so this is never set together with `needs_reprojection`
    pub needs_resampling: bool,
}

impl AlignmentPlan {
    pub fn evaluate(reference: &RasterGrid, candidate: &RasterGrid, strictness: AxisStrictness) -> Self {
        let needs_reprojection = reference.projection_name() != candidate.projection_name();

        let same_height = cell_size_ratio_is_unity(reference.cell_height(), candidate.cell_height());
        let same_width = cell_size_ratio_is_unity(reference.cell_width(), candidate.cell_width());
        let resolution_differs = match strictness {
            AxisStrictness::Both => !same_height && !same_width,
            AxisStrictness::Any => !same_height || !same_width,
        };

        AlignmentPlan {
            needs_reprojection,
            needs_resampling: resolution_differs && !needs_reprojection,
        }
    }

    /// Only the final snap onto the reference grid is needed
    pub fn is_snap_only(&self) -> bool {
        !self.needs_reprojection && !self.needs_resampling
    }
}

impl std::fmt::Display for AlignmentPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut steps = Vec::new();
        if self.needs_reprojection {
            steps.push("reproject");
        }

        if self.needs_resampling {
            steps.push("resample");
        }

        steps.push("clip and snap");
        write!(f, "{}", steps.join(" -> "))
    }
}
