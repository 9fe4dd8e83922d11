use super::{
    new_entity_id, random_ability, random_spawn_point, AbilityFlags, Contact, EntityKind,
    EntitySnapshot, SnapshotData,
};
use crate::domain::geometry::{rectangle_hull, BoundingBox, Vec2};

const POWERUP_SIZE: f64 = 20.0;

/// A stationary pickup granting one ability to the player that touches it.
#[derive(Debug)]
pub struct Powerup {
    id: String,
    position: Vec2,
    points: Vec<Vec2>,
    ability: AbilityFlags,
}

impl Powerup {
    pub fn new_random() -> Self {
        Powerup {
            id: new_entity_id(),
            position: random_spawn_point(),
            points: rectangle_hull(POWERUP_SIZE, POWERUP_SIZE),
            ability: random_ability(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn ability(&self) -> AbilityFlags {
        self.ability
    }

    pub fn bounding_box(&self) -> BoundingBox<'_> {
        BoundingBox::new(self.position, 0.0, &self.points)
    }

    /// Powerups never move.
    pub fn update(&mut self) -> bool {
        false
    }

    pub fn remove_on_collision(&mut self, other: &Contact) -> bool {
        other.kind == EntityKind::Player
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id.clone(),
            position: self.position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            data: SnapshotData::Powerup {
                ability: self.ability,
            },
        }
    }
}
