// HTTP handlers for worker registration and player joins.

use crate::domain::WorkerAddr;
use crate::interface_adapters::protocol::{
    ErrorResponse, JoinRequest, JoinResponse, RegisterRequest, RegisterResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{assign_room, PlacementError};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use session::SessionClaims;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Worker-only route: announces a (re)started worker.
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let host = payload.host.trim().to_string();
    if host.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "host is required".to_string(),
            }),
        )
            .into_response();
    }

    let addr = WorkerAddr {
        host: host.clone(),
        port: payload.port,
    };
    info!(worker = %addr.key(), "worker registered");
    state.registry.register_host(addr);

    (
        StatusCode::CREATED,
        Json(RegisterResponse {
            host,
            port: payload.port,
        }),
    )
        .into_response()
}

/// Public route: seats a player somewhere in the fleet and hands back a
/// session token scoped to that room.
pub async fn join_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JoinRequest>,
) -> impl IntoResponse {
    let username = payload.username.trim().to_string();
    if username.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "username is required".to_string(),
            }),
        )
            .into_response();
    }

    // An explicitly requested room must already exist and have space.
    let requested = payload.room_id.as_deref().map(str::trim).filter(|r| !r.is_empty());
    let placement = if let Some(room_id) = requested {
        match state.registry.reserve_named_slot(room_id) {
            Some(placement) => placement,
            None => {
                warn!(room_id, "join refused; requested room unknown or full");
                return (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "room not found or full".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    } else {
        match assign_room(&state.registry, state.worker_client.as_ref()).await {
            Ok(placement) => placement,
            Err(PlacementError::NoWorkers) => {
                warn!("join refused; no workers registered");
                return (
                    StatusCode::NOT_FOUND,
                    Json(ErrorResponse {
                        error: "no workers available".to_string(),
                    }),
                )
                    .into_response();
            }
            Err(e @ PlacementError::CreateFailed(_)) => {
                error!(error = %e, "placement failed");
                return (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: "room provisioning failed".to_string(),
                    }),
                )
                    .into_response();
            }
        }
    };

    let client_id = uuid::Uuid::new_v4().to_string();
    let claims = SessionClaims {
        client_id: client_id.clone(),
        username,
        room_id: placement.room_id.clone(),
    };
    let token = match session::mint(&claims, &state.session_secret) {
        Ok(token) => token,
        Err(e) => {
            error!(error = ?e, "failed to mint session token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "token minting failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    info!(room_id = %placement.room_id, worker = %placement.addr.key(), "player placed");
    (
        StatusCode::OK,
        Json(JoinResponse {
            host: placement.addr.host,
            port: placement.addr.port,
            room_id: placement.room_id,
            client_id,
            token,
        }),
    )
        .into_response()
}
