use super::{
    new_entity_id, random_spawn_point, AbilityFlags, Contact, Entity, EntityKind, EntitySnapshot,
    Projectile, SnapshotData,
};
use crate::domain::geometry::{rectangle_hull, BoundingBox, Vec2};
use std::f64::consts::PI;

pub const PLAYER_MAX_SPEED: f64 = 20.0;
pub const PLAYER_ACCELERATION_DECAY: f64 = 8.0;
pub const PLAYER_MAX_TURN_RATE: f64 = 0.8;
pub const PLAYER_TURN_RATE_DECAY: f64 = 4.0;
pub const PLAYER_RADIUS: f64 = 40.0;

const MULTISHOT_SPREAD: f64 = 32.0;

/// A connected pilot's ship. Steering follows the last reported cursor:
/// the cursor vector (components in [-1, 1]) sets both the target heading
/// and, through its length, the target speed.
#[derive(Debug)]
pub struct Player {
    id: String,
    username: String,
    position: Vec2,
    velocity: Vec2,
    rotation: f64,
    points: Vec<Vec2>,
    mouse: Vec2,
    mouse_pressed: bool,
    flags: AbilityFlags,
    score: u32,
}

impl Player {
    pub fn new(id: String, username: String) -> Self {
        Player {
            id,
            username,
            position: random_spawn_point(),
            velocity: Vec2::ZERO,
            rotation: -PI / 2.0,
            points: rectangle_hull(PLAYER_RADIUS * 2.0, PLAYER_RADIUS * 2.0),
            mouse: Vec2::ZERO,
            mouse_pressed: false,
            flags: AbilityFlags::default(),
            score: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn flags(&self) -> AbilityFlags {
        self.flags
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    /// Records one input report. The cursor overwrites the previous one;
    /// the fire flag is sticky so a press-and-release between two ticks
    /// still fires.
    pub fn input(&mut self, mouse_x: f64, mouse_y: f64, mouse_pressed: bool) {
        self.mouse = Vec2::new(mouse_x, mouse_y);
        self.mouse_pressed = self.mouse_pressed || mouse_pressed;
    }

    pub fn bounding_box(&self) -> BoundingBox<'_> {
        BoundingBox::new(self.position, self.rotation, &self.points)
    }

    pub fn update(&mut self) -> bool {
        let before_position = self.position;
        let before_rotation = self.rotation;
        let speed = self.velocity.length();

        // Speed eases towards the cursor-scaled target, with gains that
        // shrink as the ship gets faster.
        let target_speed = self.mouse.length().min(1.0) * PLAYER_MAX_SPEED;
        let new_speed =
            speed + (target_speed - speed) / (1.0 + PLAYER_ACCELERATION_DECAY * speed);

        // Turn towards the cursor, clamped to a speed-dependent rate.
        if self.mouse.length() > 0.0 {
            let max_turn = PLAYER_MAX_TURN_RATE / (1.0 + PLAYER_TURN_RATE_DECAY * speed);
            let delta = normalize_angle(self.mouse.angle() - self.rotation);
            self.rotation += delta.clamp(-max_turn, max_turn);
            self.rotation = normalize_angle(self.rotation);
        }

        self.velocity = self.heading().scale(new_speed);
        self.position = self.position.add(self.velocity);
        self.position != before_position || self.rotation != before_rotation
    }

    /// Fires a volley if the fire flag is set, clearing the flag.
    pub fn poll_new_entities(&mut self) -> Vec<Entity> {
        if !self.mouse_pressed {
            return Vec::new();
        }
        self.mouse_pressed = false;

        let heading = self.heading();
        let muzzle = self
            .position
            .add(heading.scale(PLAYER_RADIUS * 1.1 + super::projectile::PROJECTILE_RADIUS));
        let wide = self.flags.is_active(AbilityFlags::WIDE_BEAM);

        let mut volley = Vec::new();
        if self.flags.is_active(AbilityFlags::MULTISHOT) {
            let lateral = heading.normal();
            for offset in [-MULTISHOT_SPREAD, 0.0, MULTISHOT_SPREAD] {
                volley.push(Entity::Projectile(Projectile::new(
                    new_entity_id(),
                    self.id.clone(),
                    muzzle.add(lateral.scale(offset)),
                    self.rotation,
                    wide,
                )));
            }
        } else {
            volley.push(Entity::Projectile(Projectile::new(
                new_entity_id(),
                self.id.clone(),
                muzzle,
                self.rotation,
                wide,
            )));
        }
        volley
    }

    pub fn update_on_collision(&mut self, other: &Contact) {
        if let Some(ability) = other.ability {
            self.flags.grant(ability);
        }
    }

    pub fn remove_on_collision(&mut self, other: &Contact) -> bool {
        match other.kind {
            EntityKind::Asteroid | EntityKind::Projectile | EntityKind::Player => {
                if self.flags.is_active(AbilityFlags::SHIELD) {
                    self.flags.consume(AbilityFlags::SHIELD);
                    false
                } else {
                    true
                }
            }
            EntityKind::Powerup => false,
        }
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id.clone(),
            position: self.position,
            velocity: self.velocity,
            rotation: self.rotation,
            data: SnapshotData::Player {
                username: self.username.clone(),
                score: self.score,
                flags: self.flags,
            },
        }
    }

    fn heading(&self) -> Vec2 {
        Vec2::new(self.rotation.cos(), self.rotation.sin())
    }
}

/// Wraps an angle into (-PI, PI].
fn normalize_angle(mut angle: f64) -> f64 {
    while angle > PI {
        angle -= 2.0 * PI;
    }
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    angle
}
