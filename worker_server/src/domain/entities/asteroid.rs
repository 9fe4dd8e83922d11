use super::{new_entity_id, random_spawn_point, Contact, EntityKind, EntitySnapshot, SnapshotData};
use crate::domain::geometry::{hull_area, random_convex_hull, random_vector, BoundingBox, Vec2};

pub const ASTEROID_MAX_SPEED: f64 = 0.5;
pub const ASTEROID_MAX_SPIN: f64 = 0.001;
pub const ASTEROID_HEALTH: u32 = 3;
pub const ASTEROID_MIN_POINTS: usize = 8;
pub const ASTEROID_MAX_POINTS: usize = 16;
pub const ASTEROID_MIN_RADIUS: f64 = 20.0;
pub const ASTEROID_MAX_RADIUS: f64 = 100.0;

/// Hulls below this area are rejected as degenerate slivers.
pub const ASTEROID_MIN_AREA: f64 = 200.0;

/// A drifting rock. Random convex hull, slow drift, slow spin, and a few
/// points of health chipped away by projectile hits.
#[derive(Debug)]
pub struct Asteroid {
    id: String,
    position: Vec2,
    velocity: Vec2,
    rotation: f64,
    spin: f64,
    points: Vec<Vec2>,
    health: u32,
}

impl Asteroid {
    /// Rolls a random asteroid, or `None` if the rolled hull came out too
    /// small to collide with reliably.
    pub fn new_random() -> Option<Self> {
        let points = random_convex_hull(
            ASTEROID_MIN_POINTS,
            ASTEROID_MAX_POINTS,
            ASTEROID_MIN_RADIUS,
            ASTEROID_MAX_RADIUS,
        );
        if hull_area(&points) < ASTEROID_MIN_AREA {
            return None;
        }
        let mut rng = rand::thread_rng();
        use rand::Rng;
        Some(Asteroid {
            id: new_entity_id(),
            position: random_spawn_point(),
            velocity: random_vector(
                -ASTEROID_MAX_SPEED,
                -ASTEROID_MAX_SPEED,
                ASTEROID_MAX_SPEED,
                ASTEROID_MAX_SPEED,
            ),
            rotation: 0.0,
            spin: rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN),
            points,
            health: ASTEROID_HEALTH,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bounding_box(&self) -> BoundingBox<'_> {
        BoundingBox::new(self.position, self.rotation, &self.points)
    }

    pub fn update(&mut self) -> bool {
        self.position = self.position.add(self.velocity);
        self.rotation += self.spin;
        true
    }

    pub fn remove_on_collision(&mut self, other: &Contact) -> bool {
        match other.kind {
            EntityKind::Projectile => {
                self.health = self.health.saturating_sub(1);
                self.health == 0
            }
            EntityKind::Powerup => false,
            // Ramming a ship (or another rock) shatters it outright.
            _ => true,
        }
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id.clone(),
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            data: SnapshotData::Asteroid {
                points: self.points.clone(),
            },
        }
    }
}
