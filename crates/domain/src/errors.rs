//! Domain error definitions.

use thiserror::Error;

/// Errors raised by domain rules. The two authorization failures stay
/// separate variants so callers can report membership and ownership
/// rejections distinctly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("family group not found")]
    GroupNotFound,

    #[error("event not found")]
    EventNotFound,

    #[error("user is not a member of this family group")]
    NotGroupMember,

    #[error("user is not the creator of this event")]
    NotEventOwner,

    #[error("family group has too many members (limit: {limit})")]
    GroupTooLarge { limit: usize },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain result type.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by the persistence layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("requested resource not found")]
    NotFound,
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
