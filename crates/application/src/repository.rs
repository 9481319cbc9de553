use async_trait::async_trait;
use domain::{ChatMessage, Event, EventId, FamilyGroup, GroupId, InviteCode, RepositoryError};

#[async_trait]
pub trait FamilyGroupRepository: Send + Sync {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<FamilyGroup>, RepositoryError>;

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<FamilyGroup>, RepositoryError>;

    /// Appends one message to the group's durable log as a single atomic
    /// store operation, never a read-modify-write round trip. Returns
    /// `Ok(None)` when the group does not exist.
    async fn append_message(
        &self,
        id: GroupId,
        message: ChatMessage,
    ) -> Result<Option<ChatMessage>, RepositoryError>;

    /// Full message log in stored order; `Ok(None)` when the group does
    /// not exist.
    async fn list_messages(&self, id: GroupId)
        -> Result<Option<Vec<ChatMessage>>, RepositoryError>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persists the event record and appends its summary to the owning
    /// group inside one transactional boundary, so readers never observe a
    /// summary without a backing record or vice versa.
    async fn create_with_summary(&self, event: Event) -> Result<Event, RepositoryError>;

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError>;

    /// Natural-order window of the group's events.
    async fn list_for_group(
        &self,
        group_id: GroupId,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Event>, RepositoryError>;

    async fn count_for_group(&self, group_id: GroupId) -> Result<u64, RepositoryError>;

    async fn update(&self, event: Event) -> Result<Event, RepositoryError>;

    /// Removes the group-embedded summary and the standalone record in one
    /// transaction, summary first. Fails with `RepositoryError::NotFound`
    /// when the owning group itself is gone.
    async fn delete_with_summary(
        &self,
        event_id: EventId,
        group_id: GroupId,
    ) -> Result<(), RepositoryError>;
}
