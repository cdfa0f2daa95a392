use approx::relative_eq;

use crate::{CellSize, GeoTransform, Point, RasterSize, Rect};

/// Offsets smaller than this fraction of a cell are considered equal.
const CELL_FRACTION_TOLERANCE: f64 = 1e-6;

/// The geometric identity of a raster: its projection, pixel lattice and dimensions.
///
/// The nodata value is carried along because the readers report it together with the geometry,
/// but it does not take part in any geometric comparison.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RasterGrid {
    /// The projection definition as WKT
    projection: String,
    /// Canonical name of the projection (e.g. "WGS 84 / UTM zone 11N"), empty when unknown
    projection_name: String,
    size: RasterSize,
    geo_transform: GeoTransform,
    nodata: Option<f64>,
}

impl RasterGrid {
    pub fn new(
        projection: impl Into<String>,
        projection_name: impl Into<String>,
        size: RasterSize,
        geo_transform: GeoTransform,
        nodata: Option<f64>,
    ) -> Self {
        RasterGrid {
            projection: projection.into(),
            projection_name: projection_name.into(),
            size,
            geo_transform,
            nodata,
        }
    }

    /// Creates a north-up grid from its lower left corner
    pub fn with_origin(
        projection: impl Into<String>,
        projection_name: impl Into<String>,
        size: RasterSize,
        lower_left: Point,
        cell_size: CellSize,
        nodata: Option<f64>,
    ) -> Self {
        let top_left = Point::new(lower_left.x(), lower_left.y() - cell_size.y() * size.rows as f64);
        RasterGrid::new(
            projection,
            projection_name,
            size,
            GeoTransform::from_top_left_and_cell_size(top_left, cell_size),
            nodata,
        )
    }

    /// Creates a north-up grid that exactly covers the given extent.
    /// The extent is expected to be a multiple of the cell size.
    pub fn covering_extent(projection: impl Into<String>, projection_name: impl Into<String>, extent: &Rect, cell_size: CellSize) -> Self {
        let size = RasterSize::with_rows_cols(
            (extent.height() / cell_size.height()).round() as usize,
            (extent.width() / cell_size.width()).round() as usize,
        );

        RasterGrid::new(
            projection,
            projection_name,
            size,
            GeoTransform::from_top_left_and_cell_size(extent.top_left(), CellSize::from_height_width(cell_size.height(), cell_size.width())),
            None,
        )
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn projection_name(&self) -> &str {
        &self.projection_name
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn columns(&self) -> usize {
        self.size.cols
    }

    pub fn geo_transform(&self) -> GeoTransform {
        self.geo_transform
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<f64>) {
        self.nodata = nodata;
    }

    pub fn cell_size(&self) -> CellSize {
        self.geo_transform.cell_size()
    }

    /// The unsigned vertical cell size
    pub fn cell_height(&self) -> f64 {
        self.cell_size().height()
    }

    /// The unsigned horizontal cell size
    pub fn cell_width(&self) -> f64 {
        self.cell_size().width()
    }

    pub fn top_left(&self) -> Point {
        self.geo_transform.apply(0.0, 0.0)
    }

    pub fn bottom_right(&self) -> Point {
        self.geo_transform.apply(self.columns() as f64, self.rows() as f64)
    }

    pub fn bottom_left(&self) -> Point {
        self.geo_transform.apply(0.0, self.rows() as f64)
    }

    pub fn bounding_box(&self) -> Rect {
        Rect::from_points(self.top_left(), self.bottom_right())
    }

    /// Both grids use the same cell size and their cell edges coincide,
    /// extents and dimensions can differ.
    pub fn is_aligned_with(&self, other: &RasterGrid) -> bool {
        if !same_cell_size(self.cell_size(), other.cell_size()) {
            return false;
        }

        let offset_x = (self.top_left().x() - other.top_left().x()) / self.cell_width();
        let offset_y = (self.top_left().y() - other.top_left().y()) / self.cell_height();
        is_whole_number(offset_x) && is_whole_number(offset_y)
    }

    /// Geometric equality: same projection, cell size, origin and dimensions.
    /// The nodata value is not considered.
    pub fn has_same_geometry(&self, other: &RasterGrid) -> bool {
        if self.projection_name != other.projection_name || self.size != other.size {
            return false;
        }

        if !same_cell_size(self.cell_size(), other.cell_size()) {
            return false;
        }

        let tolerance_x = self.cell_width() * CELL_FRACTION_TOLERANCE;
        let tolerance_y = self.cell_height() * CELL_FRACTION_TOLERANCE;
        (self.top_left().x() - other.top_left().x()).abs() <= tolerance_x
            && (self.top_left().y() - other.top_left().y()).abs() <= tolerance_y
    }

    /// Expands the extent outwards so its edges fall on the cell edges of this grid.
    /// The cell lattice is extended infinitely beyond the grid extent.
    pub fn snap_extent(&self, extent: &Rect) -> Rect {
        let origin = self.top_left();
        let (width, height) = (self.cell_width(), self.cell_height());

        let snap_down = |offset: f64| if is_whole_number(offset) { offset.round() } else { offset.floor() };
        let snap_up = |offset: f64| if is_whole_number(offset) { offset.round() } else { offset.ceil() };

        let min_x = origin.x() + snap_down((extent.min_x() - origin.x()) / width) * width;
        let max_x = origin.x() + snap_up((extent.max_x() - origin.x()) / width) * width;
        let min_y = origin.y() + snap_down((extent.min_y() - origin.y()) / height) * height;
        let max_y = origin.y() + snap_up((extent.max_y() - origin.y()) / height) * height;

        Rect::from_bounds(min_x, min_y, max_x, max_y)
    }

    /// Copy of this grid with a different cell size, keeping the top left corner and covering the same extent
    pub fn with_cell_size(&self, cell_size: CellSize) -> RasterGrid {
        let extent = self.bounding_box();
        let mut grid = RasterGrid::covering_extent(self.projection.clone(), self.projection_name.clone(), &extent, cell_size);
        grid.nodata = self.nodata;
        grid
    }
}

impl std::fmt::Display for RasterGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "projection: '{}', size: {}, cell size: {}, bounds: {}",
            self.projection_name,
            self.size,
            self.cell_size(),
            self.bounding_box()
        )
    }
}

fn same_cell_size(lhs: CellSize, rhs: CellSize) -> bool {
    relative_eq!(lhs.width(), rhs.width(), max_relative = CELL_FRACTION_TOLERANCE)
        && relative_eq!(lhs.height(), rhs.height(), max_relative = CELL_FRACTION_TOLERANCE)
}

fn is_whole_number(value: f64) -> bool {
    (value - value.round()).abs() <= CELL_FRACTION_TOLERANCE
}
