//! Application layer.
//!
//! Use-case services around the domain model: input validation, the
//! authorization-then-mutate flow, and abstractions over external
//! adapters (clock, message broadcasting, persistence).

pub mod broadcaster;
pub mod clock;
pub mod dto;
pub mod error;
pub mod local_broadcast;
pub mod memory;
pub mod repository;
pub mod services;

pub use broadcaster::{BroadcastError, MessageBroadcast, MessageBroadcaster};
pub use clock::{Clock, SystemClock};
pub use dto::{ChatMessageDto, EventDto, EventPageDto, InterestDto};
pub use error::ApplicationError;
pub use local_broadcast::LocalMessageBroadcaster;
pub use memory::InMemoryStore;
pub use repository::{EventRepository, FamilyGroupRepository};
pub use services::{
    ChatService, ChatServiceDependencies, CreateEventRequest, EditEventRequest, EventService,
    EventServiceDependencies, SendChatMessageRequest,
};
