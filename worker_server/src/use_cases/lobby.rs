// Registry of active rooms on this worker.

use super::room::{Room, RoomSettings};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Errors returned by room registry operations.
#[derive(Debug)]
pub enum LobbyError {
    /// Room already exists and cannot be re-created.
    AlreadyExists,
}

/// Occupancy report for one room.
#[derive(Debug, Clone)]
pub struct RoomStatus {
    pub room_id: String,
    pub occupancy: usize,
}

/// Thread-safe registry for active rooms.
pub struct Lobby {
    /// Settings applied to newly created rooms.
    settings: RoomSettings,
    rooms: RwLock<HashMap<String, Room>>,
}

impl Lobby {
    pub fn new(settings: RoomSettings) -> Self {
        Lobby {
            settings,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a room and spawns its game task.
    pub async fn create_room(&self, room_id: String) -> Result<Room, LobbyError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room_id) {
            return Err(LobbyError::AlreadyExists);
        }
        let room = Room::new(room_id.clone(), &self.settings);
        rooms.insert(room_id, room.clone());
        Ok(room)
    }

    pub async fn get_room(&self, room_id: &str) -> Option<Room> {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).cloned()
    }

    /// Occupancy of every room, for load probes.
    pub async fn room_statuses(&self) -> Vec<RoomStatus> {
        let rooms = self.rooms.read().await;
        rooms
            .values()
            .map(|room| RoomStatus {
                room_id: room.room_id.to_string(),
                occupancy: room.occupancy(),
            })
            .collect()
    }
}
