//! In-memory store backing unit tests and local development. Both
//! repository traits are implemented over one mutex-guarded state so the
//! event/summary dual write happens under a single lock, mirroring the
//! transactional boundary of the SQL store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use domain::{
    ChatMessage, Event, EventId, FamilyGroup, GroupId, InviteCode, RepositoryError,
};

use crate::repository::{EventRepository, FamilyGroupRepository};

struct GroupRecord {
    group: FamilyGroup,
    messages: Vec<ChatMessage>,
}

#[derive(Default)]
struct State {
    groups: Vec<GroupRecord>,
    events: Vec<Event>,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a group; groups are otherwise created by the (out-of-scope)
    /// enrollment collaborator.
    pub async fn insert_group(&self, group: FamilyGroup) {
        let mut state = self.state.lock().await;
        state.groups.push(GroupRecord {
            group,
            messages: Vec::new(),
        });
    }
}

#[async_trait]
impl FamilyGroupRepository for InMemoryStore {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<FamilyGroup>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .iter()
            .find(|record| record.group.id == id)
            .map(|record| record.group.clone()))
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<FamilyGroup>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .iter()
            .find(|record| record.group.unique_code == *code)
            .map(|record| record.group.clone()))
    }

    async fn append_message(
        &self,
        id: GroupId,
        message: ChatMessage,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let mut state = self.state.lock().await;
        match state.groups.iter_mut().find(|record| record.group.id == id) {
            Some(record) => {
                record.messages.push(message.clone());
                Ok(Some(message))
            }
            None => Ok(None),
        }
    }

    async fn list_messages(
        &self,
        id: GroupId,
    ) -> Result<Option<Vec<ChatMessage>>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .groups
            .iter()
            .find(|record| record.group.id == id)
            .map(|record| record.messages.clone()))
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn create_with_summary(&self, event: Event) -> Result<Event, RepositoryError> {
        let mut state = self.state.lock().await;
        let summary = event.summary();
        let record = state
            .groups
            .iter_mut()
            .find(|record| record.group.id == event.family_group_id)
            .ok_or(RepositoryError::NotFound)?;
        record.group.events.push(summary);
        state.events.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.events.iter().find(|event| event.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.events.clone())
    }

    async fn list_for_group(
        &self,
        group_id: GroupId,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Event>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .events
            .iter()
            .filter(|event| event.family_group_id == group_id)
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count_for_group(&self, group_id: GroupId) -> Result<u64, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .events
            .iter()
            .filter(|event| event.family_group_id == group_id)
            .count() as u64)
    }

    async fn update(&self, event: Event) -> Result<Event, RepositoryError> {
        let mut state = self.state.lock().await;
        let slot = state
            .events
            .iter_mut()
            .find(|existing| existing.id == event.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = event.clone();
        Ok(event)
    }

    async fn delete_with_summary(
        &self,
        event_id: EventId,
        group_id: GroupId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        let record = state
            .groups
            .iter_mut()
            .find(|record| record.group.id == group_id)
            .ok_or(RepositoryError::NotFound)?;
        record
            .group
            .events
            .retain(|summary| summary.event_id != event_id);
        state.events.retain(|event| event.id != event_id);
        Ok(())
    }
}
