use async_trait::async_trait;
use domain::{ChatMessage, GroupId};
use thiserror::Error;

/// A newly persisted message on its way to connected clients.
#[derive(Debug, Clone)]
pub struct MessageBroadcast {
    pub group_id: GroupId,
    pub message: ChatMessage,
}

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcast failed: {message}")]
    Failed { message: String },
}

impl BroadcastError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Fan-out seam between the chat service and the websocket hub. Delivery
/// is fire-and-forget: the chat service only learns whether the hand-off
/// succeeded, never whether individual clients received the message.
#[async_trait]
pub trait MessageBroadcaster: Send + Sync {
    async fn broadcast(&self, payload: MessageBroadcast) -> Result<(), BroadcastError>;
}
