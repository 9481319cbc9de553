use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;
        use domain::DomainError;

        match error {
            AppErr::Domain(DomainError::Validation { field, message }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("{}: {}", field, message),
            ),
            AppErr::Domain(DomainError::GroupTooLarge { limit }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "GROUP_TOO_LARGE",
                format!("family group has too many members (limit: {})", limit),
            ),
            AppErr::Domain(DomainError::GroupNotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "GROUP_NOT_FOUND",
                "family group not found",
            ),
            AppErr::Domain(DomainError::EventNotFound) => {
                ApiError::new(StatusCode::NOT_FOUND, "EVENT_NOT_FOUND", "event not found")
            }
            AppErr::Domain(DomainError::NotGroupMember) => ApiError::new(
                StatusCode::FORBIDDEN,
                "NOT_GROUP_MEMBER",
                "you are not a member of this family group",
            ),
            AppErr::Domain(DomainError::NotEventOwner) => ApiError::new(
                StatusCode::FORBIDDEN,
                "NOT_EVENT_OWNER",
                "you are not authorized to modify this event",
            ),
            AppErr::Repository(repo_err) => match repo_err {
                domain::RepositoryError::NotFound => ApiError::new(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    "requested resource not found",
                ),
                domain::RepositoryError::Storage { message } => {
                    tracing::error!(detail = %message, "store operation failed");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "internal server error",
                    )
                }
            },
            AppErr::Broadcast(err) => {
                tracing::error!(detail = %err, "broadcast hand-off failed");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
