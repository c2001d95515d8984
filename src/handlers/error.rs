//! JSON error responses for the REST API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::DomainError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

/// What a handler was doing when the store failed; picks the error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Fetch,
    Create,
    Update,
    Delete,
    Move,
}

impl Action {
    fn code(self) -> &'static str {
        match self {
            Action::Fetch => "db_error",
            Action::Create => "create_failed",
            Action::Update => "update_failed",
            Action::Delete => "delete_failed",
            Action::Move => "move_failed",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Action::Fetch => "fetch",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Move => "move",
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn invalid_json() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_json", "Failed to parse request body")
    }

    pub fn invalid_id() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_id", "Invalid ID")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", "Missing or invalid API token")
    }

    pub fn api_disabled() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "api_disabled",
            "API is not enabled on this server",
        )
    }

    pub fn not_found(kind: &str, id: i64) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", format!("{} {} not found", kind, id))
    }

    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", "Route not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "Method not allowed")
    }

    /// Map a store outcome. Internal details are logged, not returned.
    pub fn from_domain(err: DomainError, action: Action, what: &str) -> Self {
        match err {
            DomainError::NotFound(message) => Self::new(StatusCode::NOT_FOUND, "not_found", message),
            DomainError::InvalidInput(message) => Self::validation(message),
            DomainError::Conflict(message) => {
                tracing::warn!(action = action.verb(), what, %message, "Write conflict");
                Self::new(StatusCode::CONFLICT, action.code(), message)
            }
            DomainError::Commit(detail) => {
                tracing::error!(action = action.verb(), what, %detail, "Commit failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "commit_failed",
                    "Failed to commit transaction",
                )
            }
            DomainError::Internal(detail) => {
                tracing::error!(action = action.verb(), what, %detail, "Store error");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    action.code(),
                    format!("Failed to {} {}", action.verb(), what),
                )
            }
        }
    }
}

/// `.map_err(failed(Action::Create, "list"))`
pub fn failed(action: Action, what: &'static str) -> impl FnOnce(DomainError) -> ApiError {
    move |err| ApiError::from_domain(err, action, what)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
