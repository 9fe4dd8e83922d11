// Pure 2D geometry: vectors, convex hulls, and oriented-box collision.

mod bounds;
mod hull;
mod vector;

pub use bounds::BoundingBox;
pub use hull::{convex_hull, hull_area, random_convex_hull, rectangle_hull};
pub use vector::{random_vector, Vec2, EPSILON};
