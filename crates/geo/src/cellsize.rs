use approx::{AbsDiffEq, RelativeEq};

/// Size of a raster cell in projection units.
/// `x` is the horizontal size, `y` the vertical size which is negative for north-up rasters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSize {
    x: f64,
    y: f64,
}

impl AbsDiffEq for CellSize {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: <f64 as AbsDiffEq>::Epsilon) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon) && f64::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for CellSize {
    fn default_max_relative() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: <f64 as AbsDiffEq>::Epsilon, max_relative: <f64 as AbsDiffEq>::Epsilon) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative) && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

impl CellSize {
    pub const fn new(x: f64, y: f64) -> Self {
        CellSize { x, y }
    }

    /// Square cells for a north-up raster
    pub const fn square(size: f64) -> Self {
        CellSize::new(size, -size)
    }

    /// North-up cell size from an unsigned height and width
    pub fn from_height_width(height: f64, width: f64) -> Self {
        CellSize::new(width.abs(), -height.abs())
    }

    pub fn is_valid(&self) -> bool {
        self.x != 0.0 && self.y != 0.0 && self.x.is_finite() && self.y.is_finite()
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// The unsigned vertical cell size
    pub fn height(&self) -> f64 {
        self.y.abs()
    }

    /// The unsigned horizontal cell size
    pub fn width(&self) -> f64 {
        self.x.abs()
    }
}

/// Formatted as `(height, width)`
impl std::fmt::Display for CellSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.height(), self.width())
    }
}
