// JSON DTOs for the master's public and fleet-internal APIs.

use serde::{Deserialize, Serialize};

/// Worker announcement sent at worker startup.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub host: String,
    pub port: u16,
}

/// Public join request from a game client. A client may ask for a
/// specific room (to join a friend); otherwise placement decides.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub username: String,
    #[serde(default)]
    pub room_id: Option<String>,
}

/// Everything the client needs to reach its assigned room.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub host: String,
    pub port: u16,
    pub room_id: String,
    pub client_id: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}

/// Shape of a worker's /internal/status payload.
#[derive(Debug, Deserialize)]
pub struct WorkerStatusResponse {
    pub rooms: Vec<WorkerRoomStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRoomStatus {
    pub room_id: String,
    pub occupancy: usize,
}

/// Shape of the worker's /internal/create request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest<'a> {
    pub room_id: &'a str,
}
