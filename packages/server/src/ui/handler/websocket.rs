//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{GroupId, LiveSink, LiveUpdate, UserId, pusher_channel},
    infrastructure::{
        dto::websocket::{InboundChatDto, LiveUpdateDto},
        live::LiveSession,
    },
    ui::state::AppState,
};

use super::error::ApiError;

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
}

/// Open a live session for `user_id` on `group_id`.
///
/// Membership is checked before the upgrade, so a rejected caller gets a
/// plain HTTP error. The history frame is already queued when the socket
/// comes up.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let group_id = GroupId::new(group_id)?;
    let user_id = UserId::new(query.user_id)?;

    let (tx, rx) = pusher_channel();
    let sink: Arc<dyn LiveSink> = Arc::new(tx);

    let session = state
        .open_live_session_usecase
        .execute(&group_id, &user_id, sink)
        .await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session, rx)))
}

/// Spawns a task that drains the connection's queue into the WebSocket sender.
///
/// Ends when the queue closes or a write fails.
fn pusher_loop(
    mut rx: mpsc::Receiver<LiveUpdate>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            let frame = LiveUpdateDto::from(update);
            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize live frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Reads client frames and submits them as the session's user.
async fn receive_loop(
    receiver: &mut SplitStream<WebSocket>,
    state: &AppState,
    session: &LiveSession,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(
                    connection_id = %session.connection_id(),
                    "WebSocket error: {}",
                    e
                );
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let inbound = match serde_json::from_str::<InboundChatDto>(&text) {
                    Ok(inbound) => inbound,
                    Err(e) => {
                        tracing::warn!(
                            connection_id = %session.connection_id(),
                            "Dropping unparseable frame: {}",
                            e
                        );
                        continue;
                    }
                };

                match state
                    .submit_message_usecase
                    .execute(session.group_id(), session.user_id(), inbound.message)
                    .await
                {
                    Ok(message) => {
                        tracing::debug!(
                            group_id = %message.group_id(),
                            message_id = %message.id(),
                            "Accepted live message"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            connection_id = %session.connection_id(),
                            "Rejected live message: {}",
                            e
                        );
                        if session.notify(LiveUpdate::Rejected(e.to_string())).is_err() {
                            break;
                        }
                    }
                }
            }
            Message::Close(_) => {
                tracing::info!(
                    connection_id = %session.connection_id(),
                    "Client requested close"
                );
                break;
            }
            // Ping/pong is answered by the WebSocket layer
            _ => {}
        }
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: LiveSession,
    rx: mpsc::Receiver<LiveUpdate>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = pusher_loop(rx, sender);

    tokio::select! {
        _ = receive_loop(&mut receiver, &state, &session) => send_task.abort(),
        _ = &mut send_task => {},
    };

    session.close();
}
