// Polymorphic game objects: players, asteroids, projectiles, powerups.

mod abilities;
mod asteroid;
mod player;
mod powerup;
mod projectile;
mod spawner;

pub use abilities::{random_ability, AbilityFlags};
pub use asteroid::Asteroid;
pub use player::Player;
pub use powerup::Powerup;
pub use projectile::Projectile;
pub use spawner::Spawner;

use crate::domain::geometry::{random_vector, BoundingBox, Vec2};
use serde::{Deserialize, Serialize};

pub const SPAWN_AREA_WIDTH: f64 = 10_000.0;
pub const SPAWN_AREA_HEIGHT: f64 = 10_000.0;

/// Fixed simulation tick rate.
pub const FPS: u32 = 60;

/// Discriminator tag shared by every entity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Player,
    Asteroid,
    Projectile,
    Powerup,
}

/// What one side of a collision pair needs to know about the other side.
/// Taking a by-value snapshot sidesteps holding two borrows into the entity
/// table while both sides react.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub kind: EntityKind,
    /// Set only for powerups: the ability granted on pickup.
    pub ability: Option<AbilityFlags>,
}

/// A game object. Closed set of variants dispatched by `match`; every
/// variant answers the same capability surface (identity, pose, bounding
/// box, per-tick update, spawn poll, collision reactions).
#[derive(Debug)]
pub enum Entity {
    Player(Player),
    Asteroid(Asteroid),
    Projectile(Projectile),
    Powerup(Powerup),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Player(p) => p.id(),
            Entity::Asteroid(a) => a.id(),
            Entity::Projectile(p) => p.id(),
            Entity::Powerup(p) => p.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Player(_) => EntityKind::Player,
            Entity::Asteroid(_) => EntityKind::Asteroid,
            Entity::Projectile(_) => EntityKind::Projectile,
            Entity::Powerup(_) => EntityKind::Powerup,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            Entity::Player(p) => p.position(),
            Entity::Asteroid(a) => a.position(),
            Entity::Projectile(p) => p.position(),
            Entity::Powerup(p) => p.position(),
        }
    }

    /// The entity's collision polygon at its current pose.
    pub fn bounding_box(&self) -> BoundingBox<'_> {
        match self {
            Entity::Player(p) => p.bounding_box(),
            Entity::Asteroid(a) => a.bounding_box(),
            Entity::Projectile(p) => p.bounding_box(),
            Entity::Powerup(p) => p.bounding_box(),
        }
    }

    /// Advances one tick of physics. Returns whether any visible state
    /// changed, for delta compression.
    pub fn update(&mut self) -> bool {
        match self {
            Entity::Player(p) => p.update(),
            Entity::Asteroid(a) => a.update(),
            Entity::Projectile(p) => p.update(),
            Entity::Powerup(p) => p.update(),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self {
            Entity::Projectile(p) => p.is_expired(),
            _ => false,
        }
    }

    /// Entities spawned by this entity this tick (players firing).
    pub fn poll_new_entities(&mut self) -> Vec<Entity> {
        match self {
            Entity::Player(p) => p.poll_new_entities(),
            _ => Vec::new(),
        }
    }

    /// Applies non-destructive collision effects from `other`.
    pub fn update_on_collision(&mut self, other: &Contact) {
        if let Entity::Player(p) = self {
            p.update_on_collision(other);
        }
    }

    /// Whether this entity dies from colliding with `other`. Evaluated
    /// independently for each side of a pair.
    pub fn remove_on_collision(&mut self, other: &Contact) -> bool {
        match self {
            Entity::Player(p) => p.remove_on_collision(other),
            Entity::Asteroid(a) => a.remove_on_collision(other),
            Entity::Projectile(p) => p.remove_on_collision(other),
            Entity::Powerup(p) => p.remove_on_collision(other),
        }
    }

    pub fn contact(&self) -> Contact {
        Contact {
            kind: self.kind(),
            ability: match self {
                Entity::Powerup(p) => Some(p.ability()),
                _ => None,
            },
        }
    }

    /// A serializable copy of the entity's visible state.
    pub fn snapshot(&self) -> EntitySnapshot {
        match self {
            Entity::Player(p) => p.snapshot(),
            Entity::Asteroid(a) => a.snapshot(),
            Entity::Projectile(p) => p.snapshot(),
            Entity::Powerup(p) => p.snapshot(),
        }
    }
}

/// Visible entity state captured at a tick boundary, for snapshots and
/// deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f64,
    pub data: SnapshotData,
}

/// Variant-specific payload of an [`EntitySnapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SnapshotData {
    Player {
        username: String,
        score: u32,
        flags: AbilityFlags,
    },
    Asteroid {
        points: Vec<Vec2>,
    },
    Projectile {
        flags: AbilityFlags,
        lifetime: i32,
    },
    Powerup {
        ability: AbilityFlags,
    },
}

impl EntitySnapshot {
    pub fn kind(&self) -> EntityKind {
        match self.data {
            SnapshotData::Player { .. } => EntityKind::Player,
            SnapshotData::Asteroid { .. } => EntityKind::Asteroid,
            SnapshotData::Projectile { .. } => EntityKind::Projectile,
            SnapshotData::Powerup { .. } => EntityKind::Powerup,
        }
    }
}

/// Process-unique entity identifier.
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A spawn point uniform over the arena, centered on the origin.
fn random_spawn_point() -> Vec2 {
    random_vector(
        -SPAWN_AREA_WIDTH / 2.0,
        -SPAWN_AREA_HEIGHT / 2.0,
        SPAWN_AREA_WIDTH / 2.0,
        SPAWN_AREA_HEIGHT / 2.0,
    )
}
