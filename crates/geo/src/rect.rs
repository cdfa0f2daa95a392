//! Axis aligned bounding rectangle in projection coordinates.

use approx::{AbsDiffEq, RelativeEq};

use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    top_left: Point,
    bottom_right: Point,
}

impl Rect {
    /// Creates the rectangle spanned by two arbitrary corner points
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let top_left = Point::new(p1.x().min(p2.x()), p1.y().max(p2.y()));
        let bottom_right = Point::new(p1.x().max(p2.x()), p1.y().min(p2.y()));

        Rect { top_left, bottom_right }
    }

    pub fn from_nw_se(nw: Point, se: Point) -> Self {
        Rect {
            top_left: nw,
            bottom_right: se,
        }
    }

    pub fn from_bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Rect::from_points(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    pub fn min_x(&self) -> f64 {
        self.top_left.x()
    }

    pub fn max_x(&self) -> f64 {
        self.bottom_right.x()
    }

    pub fn min_y(&self) -> f64 {
        self.bottom_right.y()
    }

    pub fn max_y(&self) -> f64 {
        self.top_left.y()
    }

    pub fn width(&self) -> f64 {
        (self.max_x() - self.min_x()).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max_y() - self.min_y()).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.bottom_right.x(), self.top_left.y())
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.top_left.x(), self.bottom_right.y())
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.max_y() > other.min_y()
            && self.min_y() < other.max_y()
    }
}

/// Formatted as `[min x, min y, max x, max y]`
impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.min_x(), self.min_y(), self.max_x(), self.max_y())
    }
}

impl AbsDiffEq for Rect {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.top_left.abs_diff_eq(&other.top_left, epsilon) && self.bottom_right.abs_diff_eq(&other.bottom_right, epsilon)
    }
}

impl RelativeEq for Rect {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        Point::relative_eq(&self.top_left, &other.top_left, epsilon, max_relative)
            && Point::relative_eq(&self.bottom_right, &other.bottom_right, epsilon, max_relative)
    }
}
