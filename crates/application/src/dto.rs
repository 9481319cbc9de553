use domain::{ChatMessage, Event, InterestEntry, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub author_name: String,
    pub avatar: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: Timestamp,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            author_name: message.author_name.clone(),
            avatar: message.avatar.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestDto {
    pub user_id: Uuid,
    pub is_interested: bool,
}

impl From<&InterestEntry> for InterestDto {
    fn from(entry: &InterestEntry) -> Self {
        Self {
            user_id: Uuid::from(entry.user_id),
            is_interested: entry.is_interested,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: Uuid,
    pub family_group_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: Timestamp,
    pub interested: Vec<InterestDto>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: Timestamp,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        Self {
            id: Uuid::from(event.id),
            family_group_id: Uuid::from(event.family_group_id),
            user_id: Uuid::from(event.user_id),
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            interested: event.interested.iter().map(InterestDto::from).collect(),
            created_at: event.created_at,
        }
    }
}

/// One page of a group's events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventPageDto {
    pub events: Vec<EventDto>,
    pub total_pages: u64,
    pub current_page: u32,
}
