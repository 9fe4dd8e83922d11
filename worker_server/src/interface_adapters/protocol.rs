// Wire protocol DTOs and conversions for public worker messages.
// All socket traffic is bincode-encoded; enums stay externally tagged
// because bincode cannot represent serde's internal tagging.

use crate::domain::entities::{EntitySnapshot, SnapshotData};
use crate::domain::geometry::Vec2;
use crate::use_cases::{DeltaUpdate, OutboundEvent};
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    // Another player entered the room.
    Join { id: String, username: String },
    // A player left the room.
    Quit { id: String },
    // A dead player came back.
    Respawn { id: String },
    // Echo of another player's input, for client-side prediction.
    Input {
        id: String,
        mouse_x: f64,
        mouse_y: f64,
        mouse_pressed: bool,
    },
    // Authoritative per-tick state changes.
    Delta(DeltaUpdateDto),
    // Full world state for late joiners.
    Snapshot(Vec<EntityDto>),
}

/// Messages the client sends to the server over the WebSocket. The
/// sender's identity comes from its session token, never the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientMessage {
    Input {
        mouse_x: f64,
        mouse_y: f64,
        mouse_pressed: bool,
    },
    Respawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeltaUpdateDto {
    pub timestamp: f64,
    pub updated: Vec<EntityDto>,
    pub removed: Vec<String>,
}

impl From<&DeltaUpdate> for DeltaUpdateDto {
    fn from(delta: &DeltaUpdate) -> Self {
        Self {
            timestamp: delta.timestamp,
            updated: delta.updated.iter().map(EntityDto::from).collect(),
            removed: delta.removed.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VectorDto {
    pub x: f64,
    pub y: f64,
}

impl From<Vec2> for VectorDto {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Entity state for wire transmission in snapshots and deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDto {
    pub id: String,
    pub position: VectorDto,
    pub velocity: VectorDto,
    pub rotation: f64,
    pub data: EntityDataDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityDataDto {
    Player {
        username: String,
        score: u32,
        flags: u32,
    },
    Asteroid {
        points: Vec<VectorDto>,
    },
    Projectile {
        flags: u32,
        lifetime: i32,
    },
    Powerup {
        ability: u32,
    },
}

impl From<&EntitySnapshot> for EntityDto {
    fn from(snapshot: &EntitySnapshot) -> Self {
        let data = match &snapshot.data {
            SnapshotData::Player {
                username,
                score,
                flags,
            } => EntityDataDto::Player {
                username: username.clone(),
                score: *score,
                flags: flags.bits(),
            },
            SnapshotData::Asteroid { points } => EntityDataDto::Asteroid {
                points: points.iter().map(|p| VectorDto::from(*p)).collect(),
            },
            SnapshotData::Projectile { flags, lifetime } => EntityDataDto::Projectile {
                flags: flags.bits(),
                lifetime: *lifetime,
            },
            SnapshotData::Powerup { ability } => EntityDataDto::Powerup {
                ability: ability.bits(),
            },
        };
        Self {
            id: snapshot.id.clone(),
            position: snapshot.position.into(),
            velocity: snapshot.velocity.into(),
            rotation: snapshot.rotation,
            data,
        }
    }
}

impl From<&OutboundEvent> for ServerMessage {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Join { id, username } => ServerMessage::Join {
                id: id.clone(),
                username: username.clone(),
            },
            OutboundEvent::Quit { id } => ServerMessage::Quit { id: id.clone() },
            OutboundEvent::Respawn { id } => ServerMessage::Respawn { id: id.clone() },
            OutboundEvent::Input {
                id,
                mouse_x,
                mouse_y,
                mouse_pressed,
            } => ServerMessage::Input {
                id: id.clone(),
                mouse_x: *mouse_x,
                mouse_y: *mouse_y,
                mouse_pressed: *mouse_pressed,
            },
            OutboundEvent::Delta(delta) => ServerMessage::Delta(delta.into()),
        }
    }
}

pub fn encode(msg: &ServerMessage) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(msg)
}

pub fn decode_server(bytes: &[u8]) -> Result<ServerMessage, bincode::Error> {
    bincode::deserialize(bytes)
}

pub fn decode_client(bytes: &[u8]) -> Result<ClientMessage, bincode::Error> {
    bincode::deserialize(bytes)
}

pub fn encode_client(msg: &ClientMessage) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_input_survives_the_wire() {
        let msg = ClientMessage::Input {
            mouse_x: 0.25,
            mouse_y: -1.0,
            mouse_pressed: true,
        };
        let bytes = encode_client(&msg).unwrap();
        match decode_client(&bytes).unwrap() {
            ClientMessage::Input {
                mouse_x,
                mouse_y,
                mouse_pressed,
            } => {
                assert_eq!(mouse_x, 0.25);
                assert_eq!(mouse_y, -1.0);
                assert!(mouse_pressed);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(decode_client(&[0xff; 12]).is_err());
    }

    #[test]
    fn delta_event_converts_to_wire_form() {
        let delta = DeltaUpdate {
            timestamp: 1.0,
            updated: Vec::new(),
            removed: vec!["gone".to_string()],
        };
        let msg = ServerMessage::from(&OutboundEvent::Delta(delta));
        let bytes = encode(&msg).unwrap();
        match decode_server(&bytes).unwrap() {
            ServerMessage::Delta(dto) => assert_eq!(dto.removed, vec!["gone".to_string()]),
            other => panic!("unexpected message {other:?}"),
        }
    }
}
