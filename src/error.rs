//! Unified error types for the users API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Unified error type for process-level failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by a [`UserStore`](crate::store::UserStore).
///
/// The display strings are surfaced verbatim as the `error` field of 400
/// responses, so they are part of the HTTP contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A record with the same id already exists.
    #[error("user already exists")]
    UserExists,

    /// Another record already uses this name.
    #[error("user with this name already exists")]
    UserNameExists,

    /// The id or name is empty.
    #[error("user fields cannot be empty")]
    FieldRequired,

    /// No record exists for the id.
    #[error("user not found")]
    UserNotFound,

    /// Failure of the backing implementation itself.
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Short label used for the rejection metric.
    pub fn reason(&self) -> &'static str {
        match self {
            StoreError::UserExists => "user_exists",
            StoreError::UserNameExists => "user_name_exists",
            StoreError::FieldRequired => "field_required",
            StoreError::UserNotFound => "user_not_found",
            StoreError::Backend(_) => "backend",
        }
    }
}

/// Errors produced by the HTTP handlers.
///
/// Each variant owns its status code and body shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 400 with `{"error": message}`.
    #[error("{0}")]
    BadRequest(String),

    /// 400 for a PUT without a path id.
    #[error("user id is required")]
    MissingId,

    /// 404 with `{"status": 404, "message": "User not found"}`.
    #[error("User not found")]
    UserNotFound,

    /// 404 with an empty body.
    #[error("not found")]
    NotFound,

    /// 500 with an empty body.
    #[error("internal server error")]
    Internal,
}

impl ApiError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::MissingId => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::BadRequest(_) | ApiError::MissingId => {
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            }
            ApiError::UserNotFound => (
                status,
                Json(json!({ "status": status.as_u16(), "message": self.to_string() })),
            )
                .into_response(),
            ApiError::NotFound | ApiError::Internal => status.into_response(),
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
