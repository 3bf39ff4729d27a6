use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{ApiError, ClientMessage, RoomEvent};
use crate::services::presence_service;
use crate::state::AppState;

/// Join a room's broadcast channel.
///
/// A channel exists exactly for the rooms that exist, so an unknown room is
/// rejected with the usual 404 body before the upgrade happens.
pub async fn room_channel(
    Path(room): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(events) = state.channels.subscribe(&room).await else {
        return ApiError::RoomNotFound(room).into_response();
    };
    ws.on_upgrade(move |socket| handle_socket(socket, room, events, state))
}

/// Pump one connection: inbound commands into the room, room events back out.
async fn handle_socket(
    socket: WebSocket,
    room: String,
    mut events: broadcast::Receiver<RoomEvent>,
    state: Arc<AppState>,
) {
    let connection_id = Uuid::new_v4();
    info!("connection {connection_id} joined room {room}");

    let (mut sender, mut receiver) = socket.split();

    // Inbound loop: only text frames carry commands; anything unparseable is
    // logged and skipped without dropping the connection.
    let inbound_state = state.clone();
    let inbound_room = room.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(Message::Text(raw))) = receiver.next().await {
            let msg: ClientMessage = match serde_json::from_str(&raw) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("unparseable message in room {inbound_room}: {e}");
                    continue;
                }
            };

            match msg {
                // Play/stop commands are re-broadcast to every member,
                // including the sender; nothing is persisted.
                ClientMessage::Play { instrument, sound } => {
                    inbound_state
                        .channels
                        .emit(&inbound_room, RoomEvent::InstrumentPlayed { instrument, sound })
                        .await;
                }
                ClientMessage::Stop { instrument, sound } => {
                    inbound_state
                        .channels
                        .emit(&inbound_room, RoomEvent::InstrumentStopped { instrument, sound })
                        .await;
                }
                ClientMessage::ReservedInstrument { instrument } => {
                    presence_service::claim(
                        &inbound_state,
                        &inbound_room,
                        connection_id,
                        instrument,
                    )
                    .await;
                }
            }
        }
    });

    // Outbound loop: forward room events until the client goes away or the
    // room's channel is closed (room deleted or state flushed).
    let mut send_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("failed to encode room event: {e}");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("connection {connection_id} lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // A dropped client frees whatever it still holds
    presence_service::disconnect(&state, &room, connection_id).await;
    info!("connection {connection_id} left room {room}");
}
