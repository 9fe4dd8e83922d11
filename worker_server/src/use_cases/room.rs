use super::events::{GameEvent, OutboundEvent};
use super::game::{game_task, Game};
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex, Notify};

/// Hard limit on concurrent players per room.
pub const ROOM_CAPACITY: usize = 32;

/// Shared configuration for spawning rooms.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Capacity for inbound player input events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast game events.
    pub event_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
}

#[derive(Debug)]
pub enum ConnectError {
    RoomFull,
}

/// Handle to one running arena: its channels, its state, and the set of
/// connected client ids.
#[derive(Clone)]
pub struct Room {
    pub room_id: Arc<str>,
    /// Sender for game events into the room's game task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for structured outbound events.
    pub events_tx: broadcast::Sender<OutboundEvent>,
    /// Broadcast sender for wire-encoded outbound events.
    pub bytes_tx: broadcast::Sender<Bytes>,
    /// The authoritative game state, locked per tick by the game task.
    pub game: Arc<Mutex<Game>>,
    /// Connected client ids, for capacity checks and status reports.
    clients: Arc<StdMutex<HashSet<String>>>,
    pub shutdown: Arc<Notify>,
}

impl Room {
    /// Creates a room and spawns its game task.
    pub fn new(room_id: String, settings: &RoomSettings) -> Self {
        let (input_tx, input_rx) = mpsc::channel(settings.input_channel_capacity);
        let (events_tx, _) = broadcast::channel(settings.event_broadcast_capacity);
        let (bytes_tx, _) = broadcast::channel(settings.event_broadcast_capacity);
        let game = Arc::new(Mutex::new(Game::new()));
        let shutdown = Arc::new(Notify::new());

        tokio::spawn(game_task(
            game.clone(),
            input_rx,
            events_tx.clone(),
            settings.tick_interval,
            shutdown.clone(),
        ));

        Room {
            room_id: Arc::from(room_id),
            input_tx,
            events_tx,
            bytes_tx,
            game,
            clients: Arc::new(StdMutex::new(HashSet::new())),
            shutdown,
        }
    }

    /// Admits a client and spawns their ship. A reconnect under the same
    /// id reuses the slot.
    pub async fn connect(&self, client_id: &str, username: &str) -> Result<(), ConnectError> {
        {
            let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
            if clients.len() >= ROOM_CAPACITY && !clients.contains(client_id) {
                return Err(ConnectError::RoomFull);
            }
            clients.insert(client_id.to_string());
        }

        self.game
            .lock()
            .await
            .add_player(client_id.to_string(), username.to_string());
        let _ = self.events_tx.send(OutboundEvent::Join {
            id: client_id.to_string(),
            username: username.to_string(),
        });
        Ok(())
    }

    /// Releases a client slot. Safe to call for ids that never connected.
    pub fn release(&self, client_id: &str) {
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        clients.remove(client_id);
    }

    pub fn occupancy(&self) -> usize {
        let clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());
        clients.len()
    }

    pub fn has_capacity(&self) -> bool {
        self.occupancy() < ROOM_CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RoomSettings {
        RoomSettings {
            input_channel_capacity: 64,
            event_broadcast_capacity: 16,
            tick_interval: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn connect_fills_and_refuses_at_capacity() {
        let room = Room::new("r1".into(), &settings());
        for i in 0..ROOM_CAPACITY {
            room.connect(&format!("c{i}"), "pilot").await.unwrap();
        }
        assert!(!room.has_capacity());
        assert!(matches!(
            room.connect("overflow", "pilot").await,
            Err(ConnectError::RoomFull)
        ));

        // A reconnect under an existing id is not a new slot.
        room.connect("c0", "pilot").await.unwrap();
        assert_eq!(room.occupancy(), ROOM_CAPACITY);
    }

    #[tokio::test]
    async fn release_frees_the_slot() {
        let room = Room::new("r1".into(), &settings());
        room.connect("c1", "pilot").await.unwrap();
        assert_eq!(room.occupancy(), 1);
        room.release("c1");
        assert_eq!(room.occupancy(), 0);
        room.release("c1");
        assert_eq!(room.occupancy(), 0);
    }
}
