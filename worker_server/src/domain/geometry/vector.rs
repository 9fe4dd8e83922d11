use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tolerance for floating-point comparisons throughout the geometry kernel.
pub const EPSILON: f64 = 1e-5;

/// An immutable 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x + v.x, self.y + v.y)
    }

    pub fn sub(self, v: Vec2) -> Vec2 {
        Vec2::new(self.x - v.x, self.y - v.y)
    }

    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(s * self.x, s * self.y)
    }

    pub fn dot(self, v: Vec2) -> f64 {
        self.x * v.x + self.y * v.y
    }

    pub fn cross(self, v: Vec2) -> f64 {
        self.x * v.y - self.y * v.x
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// The unit vector in this vector's direction; the zero vector maps to
    /// itself.
    pub fn unit(self) -> Vec2 {
        let length = self.length();
        if length == 0.0 {
            return Vec2::ZERO;
        }
        self.scale(1.0 / length)
    }

    /// Angle against the positive x-axis, in `[-π, π]`.
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotates anticlockwise by `theta` radians about the origin.
    pub fn rotate(self, theta: f64) -> Vec2 {
        let length = self.length();
        let angle = self.angle() + theta;
        Vec2::new(angle.cos() * length, angle.sin() * length)
    }

    /// The unit vector perpendicular to this one.
    pub fn normal(self) -> Vec2 {
        self.rotate(PI / 2.0).unit()
    }

    /// Slope of the line through the origin and this vector. May be infinite
    /// (vertical) or NaN (zero vector).
    pub fn gradient(self) -> f64 {
        self.y / self.x
    }

    /// Whether two vectors lie on parallel lines, within [`EPSILON`].
    pub fn is_parallel(self, v: Vec2) -> bool {
        ((self.angle() - v.angle()) % PI).abs() < EPSILON
    }
}

/// A vector with each coordinate drawn uniformly from the given ranges.
pub fn random_vector(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec2 {
    let mut rng = rand::thread_rng();
    use rand::Rng;
    Vec2::new(
        rng.gen_range(min_x..max_x),
        rng.gen_range(min_y..max_y),
    )
}
