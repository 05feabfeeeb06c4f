//! Basic building blocks.

use std::{
    f64::consts::TAU,
    ops::{Add, Mul, Sub},
};

use nalgebra::{Point2, Vector2};

/// A point or a displacement in the world plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle`.
    pub fn from_angle(angle: Angle) -> Self {
        Self::new(angle.0.cos(), angle.0.sin())
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self, position: Self) -> f64 {
        (*self - position).norm()
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dot(&self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z-component of the 3D cross product.
    pub fn cross(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Angle of the vector measured from the positive x-axis.
    pub fn angle(&self) -> Angle {
        Angle::new(self.y.atan2(self.x))
    }

    pub fn rotate_vector(&self, angle: Angle) -> Position {
        Position::new(
            self.x * angle.0.cos() - self.y * angle.0.sin(),
            self.x * angle.0.sin() + self.y * angle.0.cos(),
        )
    }

    /// Clamps each component independently to `[-limit, limit]`.
    pub fn clamp_per_axis(&self, limit: f64) -> Position {
        Position::new(self.x.clamp(-limit, limit), self.y.clamp(-limit, limit))
    }
}

impl From<Position> for (f32, f32) {
    fn from(value: Position) -> Self {
        (value.x as f32, value.y as f32)
    }
}

impl From<Position> for Point2<f64> {
    fn from(value: Position) -> Self {
        Point2::new(value.x, value.y)
    }
}

impl From<Point2<f64>> for Position {
    fn from(value: Point2<f64>) -> Self {
        Position::new(value.x, value.y)
    }
}

impl From<Position> for Vector2<f64> {
    fn from(value: Position) -> Self {
        Vector2::new(value.x, value.y)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Angle in radians. Not wrapped unless [`Angle::wrapped`] is called.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    /// Equivalent angle in `[0, 2π)`.
    pub fn wrapped(self) -> Self {
        let radians = self.0.rem_euclid(TAU);
        // rem_euclid rounds tiny negative inputs up to exactly 2π
        if radians >= TAU {
            Self(0.0)
        } else {
            Self(radians)
        }
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
