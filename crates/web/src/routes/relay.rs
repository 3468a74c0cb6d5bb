//! WebSocket relay: each socket joins a room and sees every other socket's moves

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use xiangqi_core::RelayMessage;

use crate::AppState;

pub async fn relay_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| relay_connection(socket, state, game_id))
}

async fn relay_connection(mut socket: WebSocket, state: Arc<AppState>, game_id: String) {
    let connection = state.next_connection_id();
    let mut events = state.join_room(&game_id);
    info!(%game_id, connection, "relay socket connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => relay_frame(&state, &game_id, connection, &text),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(%game_id, connection, "socket error: {}", e);
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) if event.origin == Some(connection) => {}
                Ok(event) => {
                    if socket.send(Message::Text(event.payload)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%game_id, connection, skipped, "relay socket fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    drop(events);
    state.leave_room(&game_id);
    info!(%game_id, connection, "relay socket disconnected");
}

/// Mirrors a peer's move into the room session and passes it on
fn relay_frame(state: &AppState, game_id: &str, connection: u64, text: &str) {
    let message = match RelayMessage::from_json(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(%game_id, connection, "dropping malformed relay frame: {}", e);
            return;
        }
    };
    let payload = match message.to_json() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(%game_id, connection, "failed to encode relay message: {}", e);
            return;
        }
    };

    let mut rooms = state.rooms();
    let Some(room) = rooms.get_mut(game_id) else {
        return;
    };

    let RelayMessage::Move(mv) = &message;
    if !room.session.apply_remote(mv) {
        debug!(%game_id, connection, from = %mv.from, "remote move not mirrored");
    }
    room.broadcast(connection, payload);
}
