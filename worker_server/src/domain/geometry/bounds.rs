use super::vector::Vec2;

/// An oriented convex polygon: local-space points in anticlockwise order,
/// viewed through the owning entity's current position and rotation.
///
/// A `BoundingBox` borrows the points and copies the pose, and is rebuilt
/// from the entity on every use, so it always reflects the entity's current
/// pose. The points themselves never change after construction.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox<'a> {
    position: Vec2,
    rotation: f64,
    points: &'a [Vec2],
}

impl<'a> BoundingBox<'a> {
    pub fn new(position: Vec2, rotation: f64, points: &'a [Vec2]) -> Self {
        Self {
            position,
            rotation,
            points,
        }
    }

    /// Uses the Separating Axis Theorem to decide whether two boxes overlap.
    ///
    /// A box trivially collides with a copy of itself at the same pose;
    /// callers comparing an entity against itself must guard on identity.
    pub fn did_collide(&self, other: &BoundingBox<'_>) -> bool {
        // Candidate axes are the world-space edge normals of both polygons,
        // deduplicated by gradient so parallel edges are only projected once.
        let mut gradients: Vec<f64> = Vec::new();
        for (rotation, normals) in [
            (self.rotation, self.normals()),
            (other.rotation, other.normals()),
        ] {
            for normal in normals {
                let mut gradient = normal.rotate(rotation).gradient();
                // A horizontal edge yields a vertical axis; collapse both
                // infinities onto one key so it is projected exactly once.
                if gradient.is_infinite() {
                    gradient = f64::INFINITY;
                }
                // A degenerate zero-length edge has no axis to contribute.
                if gradient.is_nan() {
                    continue;
                }
                if !gradients.contains(&gradient) {
                    gradients.push(gradient);
                }
            }
        }

        for gradient in gradients {
            let axis = if gradient.is_infinite() {
                Vec2::new(0.0, 1.0)
            } else {
                Vec2::new(1.0, gradient)
            };

            let (min1, max1) = self.projection_range(axis);
            let (min2, max2) = other.projection_range(axis);
            if min1 > max2 || min2 > max1 {
                return false;
            }
        }

        true
    }

    /// The minimum and maximum world-space x-coordinate over all points.
    /// Used only for broadphase edge sorting.
    pub fn horizontal_bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in self.points {
            let w = self.to_world_space(*point);
            min = min.min(w.x);
            max = max.max(w.x);
        }
        (min, max)
    }

    /// Local-space normal of each edge, one per consecutive point pair.
    fn normals(&self) -> Vec<Vec2> {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let u = self.points[i];
                let v = self.points[(i + 1) % n];
                v.sub(u).normal()
            })
            .collect()
    }

    // Rotate about the entity, then translate to its position.
    fn to_world_space(&self, v: Vec2) -> Vec2 {
        self.position.add(v.rotate(self.rotation))
    }

    /// Bounds of the scalar projection of every world-space point onto `axis`.
    fn projection_range(&self, axis: Vec2) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in self.points {
            let w = self.to_world_space(*point);
            let s = w.dot(axis) / axis.length();
            min = min.min(s);
            max = max.max(s);
        }
        (min, max)
    }
}
