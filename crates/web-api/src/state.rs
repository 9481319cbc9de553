use std::sync::Arc;

use application::{ChatService, EventService, LocalMessageBroadcaster};

use crate::auth::JwtService;
use crate::ws::ConnectionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub event_service: Arc<EventService>,
    pub chat_service: Arc<ChatService>,
    pub broadcaster: LocalMessageBroadcaster,
    pub jwt_service: Arc<JwtService>,
    pub registry: Arc<ConnectionRegistry>,
}

impl AppState {
    pub fn new(
        event_service: Arc<EventService>,
        chat_service: Arc<ChatService>,
        broadcaster: LocalMessageBroadcaster,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            event_service,
            chat_service,
            broadcaster,
            jwt_service,
            registry: Arc::new(ConnectionRegistry::new()),
        }
    }
}
