//! Centralized error handling.
//!
//! Every failure is caught at the handler boundary and converted into a JSON
//! response; no request can terminate the process. The response shapes are
//! part of the wire contract: validation failures carry an `errors` array,
//! the read-path miss carries a `message`, everything else carries `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::repository::RepoError;

pub const MSG_GENERIC_ERROR: &str = "Something went wrong";
pub const MSG_EMAIL_IN_USE: &str = "Email already in use";
pub const MSG_INVALID_DATA: &str = "Invalid data";
pub const MSG_USER_NOT_FOUND: &str = "User not found";

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input failed one or more validation rules; one message per rule.
    #[error("validation failed")]
    Validation(Vec<String>),

    /// Uniqueness conflict reported by the persistence layer on create.
    #[error("{0}")]
    Conflict(String),

    /// Write rejected as invalid data.
    #[error("{0}")]
    BadRequest(String),

    /// Read-path miss.
    #[error("{}", MSG_USER_NOT_FOUND)]
    NotFound,

    /// Unexpected failure; the detail is logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Validation failure body: `{"errors": [...]}`.
#[derive(Debug, Serialize)]
struct ValidationBody {
    errors: Vec<String>,
}

/// Generic failure body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Informational body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl AppError {
    /// Get HTTP status code.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(errors) => {
                (status, Json(ValidationBody { errors })).into_response()
            }
            AppError::Conflict(msg) | AppError::BadRequest(msg) => {
                (status, Json(ErrorBody { error: msg })).into_response()
            }
            AppError::NotFound => {
                (status, Json(MessageBody::new(MSG_USER_NOT_FOUND))).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!("internal error: {}", detail);
                (
                    status,
                    Json(ErrorBody {
                        error: MSG_GENERIC_ERROR.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Default mapping of persistence outcomes, used on the read and create
/// paths. Update and delete override it in their handlers.
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Conflict(_) => AppError::Conflict(MSG_EMAIL_IN_USE.to_string()),
            RepoError::Database(e) => AppError::Internal(e.to_string()),
        }
    }
}

/// Result type alias.
pub type AppResult<T> = Result<T, AppError>;
