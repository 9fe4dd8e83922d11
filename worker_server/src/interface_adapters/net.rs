// WebSocket handling: session-token admission, the per-client loop, and
// the per-room relay that encodes each outbound event exactly once.

use crate::interface_adapters::http::{ErrorResponse, TokenQuery};
use crate::interface_adapters::protocol::{self, ClientMessage, EntityDto, ServerMessage};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{ConnectError, GameEvent, OutboundEvent, Room};

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use futures_util::SinkExt;
use session::SessionClaims;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{error, info, info_span, warn, Instrument};

const LOG_THROTTLE: Duration = Duration::from_secs(2);

#[derive(Debug)]
enum NetError {
    InputClosed,
    EventsClosed,
}

/// Serializes each outbound event once and broadcasts the shared bytes.
/// Also the single place where a departed client's slot is released.
pub async fn event_relay(room: Room, mut events_rx: broadcast::Receiver<OutboundEvent>) {
    loop {
        match events_rx.recv().await {
            Ok(event) => {
                if let OutboundEvent::Quit { id } = &event {
                    room.release(id);
                }
                let msg = ServerMessage::from(&event);
                let bytes = match protocol::encode(&msg) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        error!(error = ?e, "failed to encode outbound event");
                        continue;
                    }
                };
                let _ = room.bytes_tx.send(Bytes::from(bytes));
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "event relay lagged; skipping to latest");
            }
            Err(broadcast::error::RecvError::Closed) => {
                warn!("events channel closed; relay exiting");
                break;
            }
        }
    }
}

pub fn spawn_room_relay(room: &Room) {
    tokio::spawn(event_relay(room.clone(), room.events_tx.subscribe()));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
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

    let room = match state.lobby.get_room(&claims.room_id).await {
        Some(room) => room,
        None => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "room not found".to_string(),
                }),
            )
                .into_response();
        }
    };

    let span = info_span!("conn", client_id = %claims.client_id, room_id = %claims.room_id);
    ws.on_upgrade(move |socket| handle_socket(socket, room, claims).instrument(span))
}

async fn handle_socket(mut socket: WebSocket, room: Room, claims: SessionClaims) {
    // Subscribe before any await so no event between admission and the
    // loop is missed.
    let mut bytes_rx = room.bytes_tx.subscribe();

    if let Err(ConnectError::RoomFull) = room.connect(&claims.client_id, &claims.username).await {
        warn!("room full; refusing connection");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: "room full".into(),
            })))
            .await;
        let _ = socket.close().await;
        return;
    }

    info!(username = %claims.username, "client connected");

    // Initial full state so the client can render before the first delta.
    let snapshot: Vec<EntityDto> = room
        .game
        .lock()
        .await
        .snapshot()
        .iter()
        .map(EntityDto::from)
        .collect();
    if let Ok(bytes) = protocol::encode(&ServerMessage::Snapshot(snapshot)) {
        if socket.send(Message::Binary(Bytes::from(bytes))).await.is_err() {
            disconnect_cleanup(&room, &claims.client_id).await;
            return;
        }
    }

    if let Err(e) = run_client_loop(&mut socket, &room, &claims.client_id, &mut bytes_rx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    disconnect_cleanup(&room, &claims.client_id).await;
    info!("client disconnected");
}

async fn run_client_loop(
    socket: &mut WebSocket,
    room: &Room,
    client_id: &str,
    bytes_rx: &mut broadcast::Receiver<Bytes>,
) -> Result<(), NetError> {
    let mut last_input_full_log = Instant::now() - LOG_THROTTLE;
    let mut last_lag_log = Instant::now() - LOG_THROTTLE;

    loop {
        let disconnect = tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Binary(data))) => {
                        handle_client_message(room, client_id, &data, &mut last_input_full_log)?;
                        false
                    }
                    Some(Ok(Message::Text(_))) => {
                        let _ = socket
                            .send(Message::Close(Some(CloseFrame {
                                code: close_code::UNSUPPORTED,
                                reason: "text messages not supported".into(),
                            })))
                            .await;
                        true
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => false,
                    Some(Ok(Message::Close(_))) | None => true,
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket recv error");
                        true
                    }
                }
            }
            outbound = bytes_rx.recv() => {
                match outbound {
                    Ok(bytes) => socket.send(Message::Binary(bytes)).await.is_err(),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        if last_lag_log.elapsed() >= LOG_THROTTLE {
                            last_lag_log = Instant::now();
                            warn!(missed = n, "client outbound lagged; continuing");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(NetError::EventsClosed);
                    }
                }
            }
        };

        if disconnect {
            let _ = socket.close().await;
            return Ok(());
        }
    }
}

fn handle_client_message(
    room: &Room,
    client_id: &str,
    data: &[u8],
    last_input_full_log: &mut Instant,
) -> Result<(), NetError> {
    let event = match protocol::decode_client(data) {
        Ok(ClientMessage::Input {
            mouse_x,
            mouse_y,
            mouse_pressed,
        }) => {
            let Some((mouse_x, mouse_y)) = sanitize_mouse(mouse_x, mouse_y) else {
                warn!("invalid input values (NaN/inf); dropping");
                return Ok(());
            };
            GameEvent::Input {
                id: client_id.to_string(),
                mouse_x,
                mouse_y,
                mouse_pressed,
            }
        }
        Ok(ClientMessage::Respawn) => GameEvent::Respawn {
            id: client_id.to_string(),
        },
        Err(e) => {
            warn!(error = %e, bytes = data.len(), "failed to decode client message");
            return Ok(());
        }
    };

    match room.input_tx.try_send(event) {
        Ok(()) => Ok(()),
        Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
            if last_input_full_log.elapsed() >= LOG_THROTTLE {
                *last_input_full_log = Instant::now();
                warn!("input channel full; dropping input");
            }
            Ok(())
        }
        Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => Err(NetError::InputClosed),
    }
}

/// Cursor components must be finite and are clamped to the unit square.
fn sanitize_mouse(mouse_x: f64, mouse_y: f64) -> Option<(f64, f64)> {
    if !mouse_x.is_finite() || !mouse_y.is_finite() {
        return None;
    }
    Some((mouse_x.clamp(-1.0, 1.0), mouse_y.clamp(-1.0, 1.0)))
}

async fn disconnect_cleanup(room: &Room, client_id: &str) {
    // The game task echoes Quit to all clients; the relay releases the
    // slot when it sees the echo.
    if room
        .input_tx
        .send(GameEvent::Quit {
            id: client_id.to_string(),
        })
        .await
        .is_err()
    {
        // Game task is gone; release directly so the slot is not leaked.
        room.release(client_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_and_rejects() {
        assert_eq!(sanitize_mouse(2.0, -3.0), Some((1.0, -1.0)));
        assert_eq!(sanitize_mouse(0.5, 0.25), Some((0.5, 0.25)));
        assert_eq!(sanitize_mouse(f64::NAN, 0.0), None);
        assert_eq!(sanitize_mouse(0.0, f64::INFINITY), None);
    }
}
