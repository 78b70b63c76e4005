use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "The requested resource was not found.")]
    pub message: String,
    /// Machine-readable error code. One of: `INVALID_ARGUMENT`,
    /// `NOT_FOUND_RESSOURCE`, `STORAGE_ACCESS_ERROR`, `INTERNAL_ERROR`.
    #[schema(example = "NOT_FOUND_RESSOURCE")]
    pub error_code: &'static str,
    /// RFC 3339 timestamp of when the error was produced.
    pub timestamp: String,
}

impl ErrorBody {
    fn new(message: String, error_code: &'static str) -> Self {
        Self {
            message,
            error_code,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    /// Per-field validation failures, rendered as a flat field-to-message map.
    Validation(BTreeMap<String, String>),
    /// A semantically invalid argument that is not tied to a single field.
    InvalidArgument(String),
    NotFound,
    /// Object storage failure. The cause was already logged at the gateway.
    Storage(String),
    Internal(String),
}

impl AppError {
    /// Single-field validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.into(), message.into());
        AppError::Validation(errors)
    }

    fn into_parts(self) -> (StatusCode, Response) {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors).into_response()),
            AppError::InvalidArgument(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(message, "INVALID_ARGUMENT")).into_response(),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new(
                    "The requested resource was not found.".into(),
                    "NOT_FOUND_RESSOURCE",
                ))
                .into_response(),
            ),
            AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(
                    "An error occurred while accessing the storage. Please try again later."
                        .into(),
                    "STORAGE_ACCESS_ERROR",
                ))
                .into_response(),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new(
                        "An unexpected error occurred".into(),
                        "INTERNAL_ERROR",
                    ))
                    .into_response(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_parts();
        (status, body).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => AppError::NotFound,
            StorageError::Access(detail) => AppError::Storage(detail),
        }
    }
}
