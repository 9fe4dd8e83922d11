use super::{Asteroid, Entity, Powerup, FPS};

pub const INITIAL_ASTEROIDS: usize = 32;
pub const INITIAL_POWERUPS: usize = 3;

const ASTEROID_SPAWN_INTERVAL: u64 = 60 * FPS as u64;
const POWERUP_SPAWN_INTERVAL: u64 = 20 * FPS as u64;
const COUNTER_RESET: u64 = 5 * 60 * FPS as u64;

/// Replenishes the arena over time. Driven once per tick by the game
/// loop, after the entity cap has been checked.
#[derive(Debug, Default)]
pub struct Spawner {
    counter: u64,
}

impl Spawner {
    pub fn new() -> Self {
        Spawner::default()
    }

    /// The initial arena population.
    pub fn init_entities(&self) -> Vec<Entity> {
        let mut spawned = Vec::new();
        for _ in 0..INITIAL_ASTEROIDS {
            if let Some(asteroid) = Asteroid::new_random() {
                spawned.push(Entity::Asteroid(asteroid));
            }
        }
        for _ in 0..INITIAL_POWERUPS {
            spawned.push(Entity::Powerup(Powerup::new_random()));
        }
        spawned
    }

    /// Advances the spawn clock one tick and returns anything due.
    pub fn poll(&mut self) -> Vec<Entity> {
        self.counter = (self.counter + 1) % COUNTER_RESET;

        let mut spawned = Vec::new();
        if self.counter % ASTEROID_SPAWN_INTERVAL == 0 {
            if let Some(asteroid) = Asteroid::new_random() {
                spawned.push(Entity::Asteroid(asteroid));
            }
        }
        if self.counter % POWERUP_SPAWN_INTERVAL == 0 {
            spawned.push(Entity::Powerup(Powerup::new_random()));
        }
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EntityKind;

    #[test]
    fn initial_population_mixes_kinds() {
        let spawned = Spawner::new().init_entities();
        let powerups = spawned
            .iter()
            .filter(|e| e.kind() == EntityKind::Powerup)
            .count();
        assert_eq!(powerups, INITIAL_POWERUPS);
        assert!(spawned.len() > INITIAL_POWERUPS);
    }

    #[test]
    fn powerup_due_every_interval() {
        let mut spawner = Spawner::new();
        let mut powerups = 0;
        for _ in 0..POWERUP_SPAWN_INTERVAL * 2 {
            powerups += spawner
                .poll()
                .iter()
                .filter(|e| e.kind() == EntityKind::Powerup)
                .count();
        }
        assert_eq!(powerups, 2);
    }

    #[test]
    fn clock_wraps_at_reset() {
        let mut spawner = Spawner::new();
        for _ in 0..COUNTER_RESET {
            spawner.poll();
        }
        assert_eq!(spawner.counter, 0);
    }
}
