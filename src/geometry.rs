//! Sizes, axis-aligned bounds and the rotated bounding-box calculation.
//!
//! Coordinates follow the image convention: origin at the top-left, x to the
//! right, y downward.

use crate::vector::Vector;

/// Width and height of a rectangle.
///
/// Negative values are not rejected, but callers must not pass a zero
/// dimension anywhere it ends up as a divisor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn mult(self, scalar: f64) -> Self {
        Self::new(self.width * scalar, self.height * scalar)
    }

    /// Width over height.
    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// True when either dimension is zero, negative or not finite.
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn to_vector(self) -> Vector {
        Vector::new(self.width, self.height)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Smallest box enclosing all `points`.
    pub fn from_points(points: &[Vector]) -> Self {
        points.iter().fold(
            Self {
                min_x: f64::INFINITY,
                max_x: f64::NEG_INFINITY,
                min_y: f64::INFINITY,
                max_y: f64::NEG_INFINITY,
            },
            |b, p| Self {
                min_x: b.min_x.min(p.x),
                max_x: b.max_x.max(p.x),
                min_y: b.min_y.min(p.y),
                max_y: b.max_y.max(p.y),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn top_left(&self) -> Vector {
        Vector::new(self.min_x, self.min_y)
    }

    pub fn center(&self) -> Vector {
        Vector::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn contains(&self, p: Vector) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Corners of an unrotated rectangle in clockwise order from the top-left.
pub fn corners(x: f64, y: f64, width: f64, height: f64) -> [Vector; 4] {
    [
        Vector::new(x, y),
        Vector::new(x + width, y),
        Vector::new(x + width, y + height),
        Vector::new(x, y + height),
    ]
}

/// Corners of the rectangle after rotating it by `rotation` radians about
/// its own centre.
pub fn rotated_corners(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> [Vector; 4] {
    let center = Vector::new(x + width / 2.0, y + height / 2.0);
    corners(x, y, width, height).map(|c| c.rotate(center, rotation))
}

/// Axis-aligned bounding box of a rectangle rotated about its centre.
///
/// All four corners take part; for arbitrary angles neither diagonal pair
/// alone determines the box.
pub fn get_bounds(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Bounds {
    if rotation == 0.0 {
        return Bounds {
            min_x: x,
            max_x: x + width,
            min_y: y,
            max_y: y + height,
        };
    }
    Bounds::from_points(&rotated_corners(x, y, width, height, rotation))
}
