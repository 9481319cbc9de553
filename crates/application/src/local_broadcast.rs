// In-process broadcaster over a tokio broadcast channel.
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::broadcaster::{BroadcastError, MessageBroadcast, MessageBroadcaster};

#[derive(Clone)]
pub struct LocalMessageBroadcaster {
    sender: broadcast::Sender<MessageBroadcast>,
}

impl LocalMessageBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MessageBroadcast> {
        self.sender.subscribe()
    }
}

impl Default for LocalMessageBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl MessageBroadcaster for LocalMessageBroadcaster {
    async fn broadcast(&self, payload: MessageBroadcast) -> Result<(), BroadcastError> {
        // send only errors when no subscriber is connected; with no one to
        // deliver to, fire-and-forget fan-out has nothing left to do.
        if self.sender.send(payload).is_err() {
            tracing::debug!("no websocket subscribers connected, message not fanned out");
        }
        Ok(())
    }
}
