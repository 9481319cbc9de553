//! Realtime broadcast hub.
//!
//! Each connection runs Connected → (loadMessages | sendMessage)* →
//! Disconnected. Direct replies (`previousMessages`, `error`) go only to
//! the requesting connection; `newMessage` fans out through the shared
//! broadcaster to every connected client, preserving the original
//! global-broadcast behavior (see DESIGN.md).

use std::collections::HashSet;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, Mutex};
use uuid::Uuid;

use application::{ApplicationError, ChatMessageDto, SendChatMessageRequest};
use domain::DomainError;

use crate::state::AppState;

/// Explicit per-process registry of live connections, keyed by id, with
/// add-on-connect / remove-on-disconnect lifecycle.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashSet<Uuid>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut connections = self.connections.lock().await;
        connections.insert(id);
        tracing::info!(connection_id = %id, active = connections.len(), "client connected");
        id
    }

    pub async fn unregister(&self, id: Uuid) {
        let mut connections = self.connections.lock().await;
        connections.remove(&id);
        tracing::info!(connection_id = %id, active = connections.len(), "client disconnected");
    }

    pub async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ClientFrame {
    #[serde(rename = "loadMessages")]
    LoadMessages { group_id: Uuid },
    #[serde(rename = "sendMessage")]
    SendMessage {
        group_id: Uuid,
        author_name: String,
        text: String,
        avatar: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ServerFrame {
    #[serde(rename = "previousMessages")]
    PreviousMessages { messages: Vec<ChatMessageDto> },
    #[serde(rename = "newMessage")]
    NewMessage { message: ChatMessageDto },
    // Deliberately just a human-readable string; the realtime error
    // contract is narrower than the HTTP one.
    #[serde(rename = "error")]
    Error { message: String },
}

pub async fn websocket_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = state.registry.register().await;
    let mut feed = state.broadcaster.subscribe();
    let (mut sender, mut incoming) = socket.split();

    // Direct replies to this connection merge with the global fan-out in
    // a single send loop so the sink has one owner.
    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel::<ServerFrame>();

    let send_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                direct = direct_rx.recv() => match direct {
                    Some(frame) => frame,
                    None => break,
                },
                fanned = feed.recv() => match fanned {
                    Ok(event) => ServerFrame::NewMessage {
                        message: ChatMessageDto::from(&event.message),
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "slow websocket client dropped fan-out messages");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            let payload = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to serialize websocket frame");
                    continue;
                }
            };
            if sender.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = incoming.next().await {
        match message {
            WsMessage::Text(text) => {
                handle_client_frame(&state, &direct_tx, text.to_string()).await;
            }
            WsMessage::Close(_) => break,
            // Ping/pong is handled by axum; binary frames are not part of
            // the protocol.
            _ => {}
        }
    }

    send_task.abort();
    state.registry.unregister(connection_id).await;
}

async fn handle_client_frame(
    state: &AppState,
    direct: &mpsc::UnboundedSender<ServerFrame>,
    text: String,
) {
    let frame: ClientFrame = match serde_json::from_str(&text) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::debug!(error = %err, "unparseable client frame");
            let _ = direct.send(ServerFrame::Error {
                message: "Unrecognized message".to_owned(),
            });
            return;
        }
    };

    match frame {
        ClientFrame::LoadMessages { group_id } => {
            match state.chat_service.load_messages(group_id).await {
                Ok(messages) => {
                    let _ = direct.send(ServerFrame::PreviousMessages { messages });
                }
                Err(err) => {
                    tracing::warn!(%group_id, error = %err, "loadMessages failed");
                    let _ = direct.send(ServerFrame::Error {
                        message: load_error_text(&err),
                    });
                }
            }
        }
        ClientFrame::SendMessage {
            group_id,
            author_name,
            text,
            avatar,
        } => {
            let request = SendChatMessageRequest {
                group_id,
                author_name,
                avatar,
                text,
            };
            // On success the broadcaster fans the persisted message out to
            // every connection, including this one; nothing to reply here.
            if let Err(err) = state.chat_service.send_message(request).await {
                tracing::warn!(%group_id, error = %err, "sendMessage failed");
                let _ = direct.send(ServerFrame::Error {
                    message: send_error_text(&err),
                });
            }
        }
    }
}

fn load_error_text(err: &ApplicationError) -> String {
    match err {
        ApplicationError::Domain(DomainError::GroupNotFound) => "Family group not found".to_owned(),
        _ => "Error fetching messages".to_owned(),
    }
}

fn send_error_text(err: &ApplicationError) -> String {
    match err {
        ApplicationError::Domain(DomainError::GroupNotFound) => "Family group not found".to_owned(),
        _ => "Error saving message".to_owned(),
    }
}
