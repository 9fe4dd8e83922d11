use super::{Contact, EntityKind, EntitySnapshot, SnapshotData};
use crate::domain::geometry::{rectangle_hull, BoundingBox, Vec2};

pub const PROJECTILE_SPEED: f64 = 24.0;
pub const PROJECTILE_RADIUS: f64 = 10.0;

/// Lifetime in ticks: 2.4 seconds of flight.
pub const PROJECTILE_LIFETIME: i32 = 144;

/// A fired shot. Travels along its spawn heading at constant speed and
/// expires after a fixed number of ticks.
#[derive(Debug)]
pub struct Projectile {
    id: String,
    shooter_id: String,
    position: Vec2,
    velocity: Vec2,
    rotation: f64,
    points: Vec<Vec2>,
    flags: super::AbilityFlags,
    lifetime: i32,
}

impl Projectile {
    pub fn new(id: String, shooter_id: String, position: Vec2, rotation: f64, wide: bool) -> Self {
        let heading = Vec2::new(rotation.cos(), rotation.sin());
        let (points, flags) = if wide {
            (
                rectangle_hull(PROJECTILE_RADIUS * 2.0, PROJECTILE_RADIUS * 8.0),
                super::AbilityFlags::WIDE_BEAM,
            )
        } else {
            (
                rectangle_hull(PROJECTILE_RADIUS, PROJECTILE_RADIUS),
                super::AbilityFlags::default(),
            )
        };
        Projectile {
            id,
            shooter_id,
            position,
            velocity: heading.scale(PROJECTILE_SPEED),
            rotation,
            points,
            flags,
            lifetime: PROJECTILE_LIFETIME,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shooter_id(&self) -> &str {
        &self.shooter_id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bounding_box(&self) -> BoundingBox<'_> {
        BoundingBox::new(self.position, self.rotation, &self.points)
    }

    pub fn update(&mut self) -> bool {
        self.position = self.position.add(self.velocity);
        self.lifetime -= 1;
        true
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime < 0
    }

    pub fn remove_on_collision(&mut self, other: &Contact) -> bool {
        match other.kind {
            EntityKind::Asteroid | EntityKind::Player => true,
            EntityKind::Projectile | EntityKind::Powerup => false,
        }
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id.clone(),
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            data: SnapshotData::Projectile {
                flags: self.flags,
                lifetime: self.lifetime,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_lifetime_ticks() {
        let mut p = Projectile::new("s1".into(), "p1".into(), Vec2::ZERO, 0.0, false);
        for _ in 0..PROJECTILE_LIFETIME {
            p.update();
            assert!(!p.is_expired());
        }
        p.update();
        assert!(p.is_expired());
    }

    #[test]
    fn travels_along_spawn_heading() {
        let mut p = Projectile::new("s1".into(), "p1".into(), Vec2::ZERO, 0.0, false);
        p.update();
        assert_eq!(p.position(), Vec2::new(PROJECTILE_SPEED, 0.0));
    }

    #[test]
    fn wide_beam_hull_is_wider() {
        let narrow = Projectile::new("s1".into(), "p1".into(), Vec2::ZERO, 0.0, false);
        let wide = Projectile::new("s2".into(), "p1".into(), Vec2::ZERO, 0.0, true);
        let narrow_span = narrow.bounding_box().horizontal_bounds();
        let wide_span = wide.bounding_box().horizontal_bounds();
        assert!(wide_span.1 - wide_span.0 > narrow_span.1 - narrow_span.0);
    }
}
