//! Domain layer for the family coordination service.
//!
//! Entities, value objects, and the pure decision logic (membership guard,
//! pagination engine). Nothing here performs I/O.

pub mod errors;
pub mod event;
pub mod family_group;
pub mod membership;
pub mod pagination;
pub mod value_objects;

pub use errors::{DomainError, DomainResult, RepositoryError};
pub use event::{Event, EventChanges, InterestEntry};
pub use family_group::{
    ChatMessage, EventSummary, FamilyGroup, GroupMember, MEMBER_SNAPSHOT_CAP,
};
pub use pagination::{paginate, PageWindow};
pub use value_objects::{EventId, GroupId, InviteCode, Timestamp, UserId};
