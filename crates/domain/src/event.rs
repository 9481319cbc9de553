use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::errors::DomainError;
use crate::family_group::{EventSummary, FamilyGroup, MEMBER_SNAPSHOT_CAP};
use crate::value_objects::{EventId, GroupId, Timestamp, UserId};

/// One entry of an event's interest snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestEntry {
    pub user_id: UserId,
    pub is_interested: bool,
}

/// A scheduled event. `family_group_id` and `user_id` (the creator) are
/// set at creation and never change; the creator id gates edit and delete.
/// The interested list is a snapshot of group membership at creation time
/// and is not re-synced when membership later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub family_group_id: GroupId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: Timestamp,
    pub interested: Vec<InterestEntry>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: Timestamp,
}

/// Optional field changes for an event edit. `None` leaves a field
/// untouched; callers collapse provided-but-empty input to `None` before
/// building one of these.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<Timestamp>,
}

impl Event {
    /// Builds a new event for `group`, snapshotting up to
    /// `MEMBER_SNAPSHOT_CAP` current members into the interested list with
    /// `is_interested = false`. Fails with `GroupTooLarge` before anything
    /// is persisted when the group is over the member cap.
    pub fn create(
        id: EventId,
        group: &FamilyGroup,
        creator: UserId,
        title: String,
        description: String,
        date: Timestamp,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        if group.exceeds_member_cap() {
            return Err(DomainError::GroupTooLarge {
                limit: MEMBER_SNAPSHOT_CAP,
            });
        }

        Ok(Self {
            id,
            family_group_id: group.id,
            user_id: creator,
            title,
            description,
            date,
            interested: group
                .members
                .iter()
                .take(MEMBER_SNAPSHOT_CAP)
                .map(|member| InterestEntry {
                    user_id: member.user_id,
                    is_interested: false,
                })
                .collect(),
            created_at: now,
        })
    }

    /// The denormalized summary embedded in the owning group.
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            event_id: self.id,
            user_id: self.user_id,
            title: self.title.clone(),
        }
    }

    /// Applies the provided field changes, leaving absent fields unchanged.
    pub fn apply(&mut self, changes: EventChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(date) = changes.date {
            self.date = date;
        }
    }

    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

pub fn validate_title(raw: impl Into<String>) -> Result<String, DomainError> {
    let value = raw.into();
    if value.trim().is_empty() {
        return Err(DomainError::validation("title", "cannot be empty"));
    }
    Ok(value)
}

pub fn validate_description(raw: impl Into<String>) -> Result<String, DomainError> {
    let value = raw.into();
    if value.trim().is_empty() {
        return Err(DomainError::validation("description", "cannot be empty"));
    }
    Ok(value)
}

/// Event dates arrive on the wire as RFC 3339 strings.
pub fn parse_event_date(raw: &str) -> Result<Timestamp, DomainError> {
    Timestamp::parse(raw, &Rfc3339)
        .map_err(|_| DomainError::validation("date", "must be a valid RFC 3339 date"))
}
