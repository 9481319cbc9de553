use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, GroupId, InviteCode, Timestamp, UserId};

/// Maximum number of members snapshotted into an event's interested list.
/// A group with exactly this many members may still create events; the
/// snapshot slices to the first `MEMBER_SNAPSHOT_CAP` entries. A group with
/// more members is rejected outright at event creation.
pub const MEMBER_SNAPSHOT_CAP: usize = 100;

/// An enrolled member of a family group. Uniqueness of `user_id` is
/// guaranteed by the enrollment collaborator, not by this structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    pub full_name: String,
}

/// Denormalized event summary embedded in the owning group, mirroring a
/// full `Event` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: EventId,
    pub user_id: UserId,
    pub title: String,
}

/// A single chat message in a group's append-only log. The timestamp is
/// assigned server-side at append time; messages are never edited or
/// deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author_name: String,
    pub avatar: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(
        author_name: impl Into<String>,
        avatar: impl Into<String>,
        text: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            avatar: avatar.into(),
            text: text.into(),
            timestamp,
        }
    }
}

/// The family group aggregate: membership list plus the ordered event
/// summary list. The message log lives in the same aggregate but is only
/// reachable through the repository's append/read operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyGroup {
    pub id: GroupId,
    pub unique_code: InviteCode,
    pub name: String,
    pub members: Vec<GroupMember>,
    pub events: Vec<EventSummary>,
}

impl FamilyGroup {
    pub fn is_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|member| member.user_id == user_id)
    }

    /// Strictly-greater comparison: a group with exactly
    /// `MEMBER_SNAPSHOT_CAP` members is still allowed to create events.
    pub fn exceeds_member_cap(&self) -> bool {
        self.members.len() > MEMBER_SNAPSHOT_CAP
    }
}
