//! Immutable 2D vector used by every part of the geometry engine.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// A point or displacement in 2D space.
///
/// Every operation returns a new value; a `Vector` is never mutated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn mult(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    /// Divides both components. A zero divisor is not guarded against.
    pub fn div(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }

    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is zero.
    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            return Self::ZERO;
        }
        self.div(mag)
    }

    /// Scales the vector down so its magnitude is at most `max`.
    pub fn limit(self, max: f64) -> Self {
        if self.magnitude() > max {
            self.normalize().mult(max)
        } else {
            self
        }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        self.sub(other).magnitude()
    }

    /// Rotates this point by `angle` radians around `pivot`.
    ///
    /// Positive angles turn clockwise on screen, where y grows downward.
    pub fn rotate(self, pivot: Self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let d = self.sub(pivot);
        Self::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos).add(pivot)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector::add(self, rhs)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Vector::sub(self, rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.mult(rhs)
    }
}

impl Div<f64> for Vector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Vector::div(self, rhs)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        self.mult(-1.0)
    }
}
