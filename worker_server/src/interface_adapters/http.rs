// HTTP handlers for room management and world snapshots.

use crate::interface_adapters::net::spawn_room_relay;
use crate::interface_adapters::protocol::{self, EntityDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::use_cases::LobbyError;

use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    // Human-readable error string for consistent JSON error responses.
    pub error: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    // Room id assigned by the master.
    pub room_id: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRoomResponse {
    room_id: String,
}

#[derive(Debug, serde::Serialize)]
struct StatusResponse {
    rooms: Vec<RoomStatusDto>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomStatusDto {
    room_id: String,
    occupancy: usize,
}

#[derive(Debug, serde::Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

/// Master-only route: provisions a room and starts its game loop.
pub async fn create_room_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRoomRequest>,
) -> impl IntoResponse {
    let room_id = payload.room_id.trim().to_string();
    if room_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "room_id is required".to_string(),
            }),
        )
            .into_response();
    }

    match state.lobby.create_room(room_id.clone()).await {
        Ok(room) => {
            // Start the relay so clients can subscribe immediately.
            spawn_room_relay(&room);
            info!(room_id = %room_id, "room created");
            (StatusCode::CREATED, Json(CreateRoomResponse { room_id })).into_response()
        }
        Err(LobbyError::AlreadyExists) => {
            warn!(room_id = %room_id, "room already exists");
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: "room already exists".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Master-only route: occupancy of every room on this worker.
pub async fn status_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rooms = state
        .lobby
        .room_statuses()
        .await
        .into_iter()
        .map(|status| RoomStatusDto {
            room_id: status.room_id,
            occupancy: status.occupancy,
        })
        .collect();
    Json(StatusResponse { rooms }).into_response()
}

/// Full world snapshot of the room named by the caller's session token.
pub async fn snapshot_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> impl IntoResponse {
    let claims = match session::verify(&query.token, &state.session_secret) {
        Ok(claims) => claims,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "invalid session token".to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(room) = state.lobby.get_room(&claims.room_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "room not found".to_string(),
            }),
        )
            .into_response();
    };

    let snapshot: Vec<EntityDto> = room
        .game
        .lock()
        .await
        .snapshot()
        .iter()
        .map(EntityDto::from)
        .collect();

    match protocol::encode(&ServerMessage::Snapshot(snapshot)) {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response(),
        Err(e) => {
            error!(error = ?e, "failed to encode snapshot");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "snapshot encoding failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}
