//! Membership guard: pure authorization predicates over already-loaded
//! data. Every mutating or group-scoped read operation runs one of these
//! before touching the store.

use crate::errors::DomainError;
use crate::family_group::FamilyGroup;
use crate::value_objects::UserId;

/// Requires `user_id` to be enrolled in `group`.
pub fn ensure_member(group: &FamilyGroup, user_id: UserId) -> Result<(), DomainError> {
    if group.is_member(user_id) {
        Ok(())
    } else {
        Err(DomainError::NotGroupMember)
    }
}

/// Requires `user_id` to be the creator of the entity. Ownership, not
/// membership: members who did not create an event cannot edit or delete it.
pub fn ensure_owner(creator: UserId, user_id: UserId) -> Result<(), DomainError> {
    if creator == user_id {
        Ok(())
    } else {
        Err(DomainError::NotEventOwner)
    }
}
