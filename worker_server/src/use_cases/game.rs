use super::events::{DeltaUpdate, GameEvent, OutboundEvent};
use crate::domain::collision::resolve_collisions_line_sweep;
use crate::domain::entities::{Contact, Entity, EntityKind, EntitySnapshot, Player, Spawner};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{broadcast, mpsc, Mutex, Notify};
use tracing::info;

/// World spawns stop once the arena holds this many entities. Player
/// volleys are exempt so firing never jams at the cap.
pub const MAX_ENTITY_COUNT: usize = 256;

/// Authoritative state of one arena. Owned by a [`game_task`] and shared
/// behind a mutex so snapshot requests can read it between ticks.
pub struct Game {
    entities: HashMap<String, Entity>,
    /// Usernames survive player removal so a respawn keeps its name.
    usernames: HashMap<String, String>,
    spawner: Spawner,
    updated: HashSet<String>,
    removed: Vec<String>,
}

impl Game {
    pub fn new() -> Self {
        Game {
            entities: HashMap::new(),
            usernames: HashMap::new(),
            spawner: Spawner::new(),
            updated: HashSet::new(),
            removed: Vec::new(),
        }
    }

    /// Populates the initial asteroid field and powerups.
    pub fn seed(&mut self) {
        for entity in self.spawner.init_entities() {
            self.insert_entity(entity);
        }
    }

    pub fn add_player(&mut self, id: String, username: String) {
        self.usernames.insert(id.clone(), username.clone());
        self.insert_entity(Entity::Player(Player::new(id, username)));
    }

    /// Removes the player's ship. Idempotent; the username stays behind
    /// for a later respawn.
    pub fn remove_player(&mut self, id: &str) {
        if self.entities.remove(id).is_some() {
            self.removed.push(id.to_string());
        }
    }

    /// Spawns a fresh ship for a known, currently dead player. A no-op
    /// for unknown ids or players that are still alive.
    pub fn respawn_player(&mut self, id: &str) {
        if self.entities.contains_key(id) {
            return;
        }
        let Some(username) = self.usernames.get(id) else {
            return;
        };
        self.insert_entity(Entity::Player(Player::new(
            id.to_string(),
            username.clone(),
        )));
    }

    pub fn input(&mut self, id: &str, mouse_x: f64, mouse_y: f64, mouse_pressed: bool) {
        if let Some(Entity::Player(player)) = self.entities.get_mut(id) {
            player.input(mouse_x, mouse_y, mouse_pressed);
        }
    }

    pub fn player_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| e.kind() == EntityKind::Player)
            .count()
    }

    /// A full snapshot of every entity, for late joiners.
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities.values().map(Entity::snapshot).collect()
    }

    /// Advances the simulation one tick and drains the accumulated
    /// changes into a delta.
    pub fn tick(&mut self) -> DeltaUpdate {
        for (id, entity) in self.entities.iter_mut() {
            if entity.update() {
                self.updated.insert(id.clone());
            }
        }

        // Collect pairs first; reaction code needs mutable table access.
        let mut pairs: Vec<(String, String)> = Vec::new();
        resolve_collisions_line_sweep(&self.entities, &mut |a, b| {
            pairs.push((a.to_string(), b.to_string()));
        });
        for (a, b) in pairs {
            self.handle_collision(&a, &b);
        }

        let expired: Vec<String> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.is_expired())
            .map(|(id, _)| id.clone())
            .collect();
        for id in expired {
            self.entities.remove(&id);
            self.removed.push(id);
        }

        let mut spawned = Vec::new();
        for entity in self.entities.values_mut() {
            spawned.append(&mut entity.poll_new_entities());
        }
        if self.entities.len() < MAX_ENTITY_COUNT {
            spawned.append(&mut self.spawner.poll());
        }
        for entity in spawned {
            self.insert_entity(entity);
        }

        let updated = std::mem::take(&mut self.updated)
            .into_iter()
            .filter_map(|id| self.entities.get(&id).map(Entity::snapshot))
            .collect();
        DeltaUpdate {
            timestamp: now_millis(),
            updated,
            removed: std::mem::take(&mut self.removed),
        }
    }

    fn insert_entity(&mut self, entity: Entity) {
        let id = entity.id().to_string();
        self.updated.insert(id.clone());
        self.entities.insert(id, entity);
    }

    /// Resolves one colliding pair. Each side reacts to a by-value
    /// contact snapshot of the other, so earlier pairs removing either
    /// side this tick turn the whole pair into a no-op.
    fn handle_collision(&mut self, id_a: &str, id_b: &str) {
        let (contact_a, contact_b) = match (self.entities.get(id_a), self.entities.get(id_b)) {
            (Some(a), Some(b)) => (a.contact(), b.contact()),
            _ => return,
        };

        self.apply_collision(id_a, &contact_b);
        self.apply_collision(id_b, &contact_a);
    }

    fn apply_collision(&mut self, id: &str, other: &Contact) {
        let Some(entity) = self.entities.get_mut(id) else {
            return;
        };
        entity.update_on_collision(other);
        if !entity.remove_on_collision(other) {
            self.updated.insert(id.to_string());
            return;
        }

        let shooter = match self.entities.remove(id) {
            Some(Entity::Projectile(projectile)) if other.kind == EntityKind::Player => {
                Some(projectile.shooter_id().to_string())
            }
            _ => None,
        };
        self.removed.push(id.to_string());

        // Credit the shot; the shooter may already be gone.
        if let Some(shooter_id) = shooter {
            if let Some(Entity::Player(player)) = self.entities.get_mut(&shooter_id) {
                player.add_score(1);
                self.updated.insert(shooter_id);
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

/// Drives one arena at a fixed tick rate. Inbound events are re-broadcast
/// to all clients before they are applied, then each tick's delta follows.
pub async fn game_task(
    game: Arc<Mutex<Game>>,
    mut input_rx: mpsc::Receiver<GameEvent>,
    events_tx: broadcast::Sender<OutboundEvent>,
    tick_interval: Duration,
    shutdown: Arc<Notify>,
) {
    game.lock().await.seed();

    let mut interval = tokio::time::interval(tick_interval);
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("game task shutting down");
                break;
            }
            _ = interval.tick() => {}
        }

        {
            let mut game = game.lock().await;
            while let Ok(event) = input_rx.try_recv() {
                let _ = events_tx.send(outbound_echo(&event));
                match event {
                    GameEvent::Input {
                        id,
                        mouse_x,
                        mouse_y,
                        mouse_pressed,
                    } => game.input(&id, mouse_x, mouse_y, mouse_pressed),
                    GameEvent::Respawn { id } => game.respawn_player(&id),
                    GameEvent::Quit { id } => game.remove_player(&id),
                }
            }

            let delta = game.tick();
            let _ = events_tx.send(OutboundEvent::Delta(delta));
        }
    }
}

fn outbound_echo(event: &GameEvent) -> OutboundEvent {
    match event {
        GameEvent::Input {
            id,
            mouse_x,
            mouse_y,
            mouse_pressed,
        } => OutboundEvent::Input {
            id: id.clone(),
            mouse_x: *mouse_x,
            mouse_y: *mouse_y,
            mouse_pressed: *mouse_pressed,
        },
        GameEvent::Respawn { id } => OutboundEvent::Respawn { id: id.clone() },
        GameEvent::Quit { id } => OutboundEvent::Quit { id: id.clone() },
    }
}

fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
        * 1000.0
}
