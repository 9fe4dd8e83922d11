// Use-case level inputs/outputs for the game loop.

use crate::domain::entities::EntitySnapshot;

/// Inbound events from connected clients.
#[derive(Debug, Clone)]
pub enum GameEvent {
    Input {
        id: String,
        mouse_x: f64,
        mouse_y: f64,
        mouse_pressed: bool,
    },
    Respawn {
        id: String,
    },
    Quit {
        id: String,
    },
}

/// Events fanned out to every connected client. Inbound events are
/// re-broadcast verbatim so clients can run their own prediction; the
/// per-tick delta carries the authoritative state.
#[derive(Debug, Clone)]
pub enum OutboundEvent {
    Join {
        id: String,
        username: String,
    },
    Quit {
        id: String,
    },
    Respawn {
        id: String,
    },
    Input {
        id: String,
        mouse_x: f64,
        mouse_y: f64,
        mouse_pressed: bool,
    },
    Delta(DeltaUpdate),
}

/// One tick's worth of authoritative state changes.
#[derive(Debug, Clone)]
pub struct DeltaUpdate {
    /// Wall-clock milliseconds since the Unix epoch.
    pub timestamp: f64,
    /// Entities whose visible state changed this tick.
    pub updated: Vec<EntitySnapshot>,
    /// Ids removed from the arena this tick.
    pub removed: Vec<String>,
}
