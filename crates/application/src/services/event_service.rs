use std::sync::Arc;

use domain::{
    event, membership, paginate, DomainError, Event, EventChanges, EventId, GroupId,
    InviteCode, RepositoryError, UserId,
};
use uuid::Uuid;

use crate::{
    clock::Clock,
    dto::{EventDto, EventPageDto},
    error::ApplicationError,
    repository::{EventRepository, FamilyGroupRepository},
};

#[derive(Debug, Clone)]
pub struct CreateEventRequest {
    pub unique_code: String,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct EditEventRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|field| !field.trim().is_empty())
}

pub struct EventServiceDependencies {
    pub group_repository: Arc<dyn FamilyGroupRepository>,
    pub event_repository: Arc<dyn EventRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Event lifecycle manager: create, read, update, delete, paginate.
/// Authorization runs before every store mutation; the dual write against
/// the event record and the group's summary list is delegated to the
/// repository's transactional operations.
pub struct EventService {
    deps: EventServiceDependencies,
}

impl EventService {
    pub fn new(deps: EventServiceDependencies) -> Self {
        Self { deps }
    }

    /// Unscoped listing of every event, kept for compatibility with the
    /// original surface. Callers still need a valid identity to reach it.
    pub async fn list_all(&self) -> Result<Vec<EventDto>, ApplicationError> {
        let events = self.deps.event_repository.list_all().await?;
        Ok(events.iter().map(EventDto::from).collect())
    }

    pub async fn list_for_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<EventPageDto, ApplicationError> {
        let group_id = GroupId::from(group_id);
        let user_id = UserId::from(user_id);

        let group = self
            .deps
            .group_repository
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        if let Err(err) = membership::ensure_member(&group, user_id) {
            tracing::warn!(%group_id, %user_id, "membership check failed for event listing");
            return Err(err.into());
        }

        let total = self.deps.event_repository.count_for_group(group_id).await?;
        let window = paginate(page, limit, total);
        let events = self
            .deps
            .event_repository
            .list_for_group(group_id, window.skip, window.limit)
            .await?;

        Ok(EventPageDto {
            events: events.iter().map(EventDto::from).collect(),
            total_pages: window.total_pages,
            current_page: window.page,
        })
    }

    pub async fn create(&self, request: CreateEventRequest) -> Result<EventDto, ApplicationError> {
        // Field validation happens before any store access.
        let code = InviteCode::parse(request.unique_code)?;
        let title = event::validate_title(request.title)?;
        let description = event::validate_description(request.description)?;
        let date = event::parse_event_date(&request.date)?;
        let user_id = UserId::from(request.user_id);

        let group = self
            .deps
            .group_repository
            .find_by_invite_code(&code)
            .await?
            .ok_or(DomainError::GroupNotFound)?;

        if let Err(err) = membership::ensure_member(&group, user_id) {
            tracing::warn!(group_id = %group.id, %user_id, "membership check failed for event creation");
            return Err(err.into());
        }

        let new_event = Event::create(
            EventId::from(Uuid::new_v4()),
            &group,
            user_id,
            title,
            description,
            date,
            self.deps.clock.now(),
        )?;

        let created = self
            .deps
            .event_repository
            .create_with_summary(new_event)
            .await?;

        tracing::info!(event_id = %created.id, group_id = %group.id, "event created");
        Ok(EventDto::from(&created))
    }

    pub async fn edit(&self, request: EditEventRequest) -> Result<EventDto, ApplicationError> {
        // A provided-but-empty field counts as absent and keeps the stored
        // value; only a non-empty, unparseable date is an error.
        let changes = EventChanges {
            title: non_empty(request.title),
            description: non_empty(request.description),
            date: non_empty(request.date)
                .as_deref()
                .map(event::parse_event_date)
                .transpose()?,
        };

        let event_id = EventId::from(request.event_id);
        let user_id = UserId::from(request.user_id);

        let mut event = self
            .deps
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::EventNotFound)?;

        if let Err(err) = membership::ensure_owner(event.user_id, user_id) {
            tracing::warn!(%event_id, %user_id, "ownership check failed for event edit");
            return Err(err.into());
        }

        event.apply(changes);
        let updated = self.deps.event_repository.update(event).await?;
        Ok(EventDto::from(&updated))
    }

    pub async fn delete(&self, event_id: Uuid, user_id: Uuid) -> Result<(), ApplicationError> {
        let event_id = EventId::from(event_id);
        let user_id = UserId::from(user_id);

        let event = self
            .deps
            .event_repository
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::EventNotFound)?;

        if let Err(err) = membership::ensure_owner(event.user_id, user_id) {
            tracing::warn!(%event_id, %user_id, "ownership check failed for event deletion");
            return Err(err.into());
        }

        match self
            .deps
            .event_repository
            .delete_with_summary(event_id, event.family_group_id)
            .await
        {
            Ok(()) => {
                tracing::info!(%event_id, group_id = %event.family_group_id, "event deleted");
                Ok(())
            }
            // The owning group vanished between the event lookup and the
            // delete; reported the same way the original surface did.
            Err(RepositoryError::NotFound) => Err(DomainError::GroupNotFound.into()),
            Err(err) => Err(err.into()),
        }
    }
}
