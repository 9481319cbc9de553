mod chat_service;
mod event_service;

#[cfg(test)]
mod event_service_tests;

pub use chat_service::{ChatService, ChatServiceDependencies, SendChatMessageRequest};
pub use event_service::{
    CreateEventRequest, EditEventRequest, EventService, EventServiceDependencies,
};
