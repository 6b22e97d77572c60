//! Unified error types for the reviewer service
//!
//! This module defines error types for each layer:
//! - `DomainError`: Core business logic errors (validation, business rules, infrastructure)
//! - `AppError`: Application layer errors (wraps domain errors for HTTP responses)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Business rule outcomes callers are expected to branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    TeamExists,
    PrExists,
    PrMerged,
    NotAssigned,
    NoCandidate,
    NotFound,
}

impl ErrorCode {
    /// Wire representation used in error bodies and bulk reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TeamExists => "TEAM_EXISTS",
            ErrorCode::PrExists => "PR_EXISTS",
            ErrorCode::PrMerged => "PR_MERGED",
            ErrorCode::NotAssigned => "NOT_ASSIGNED",
            ErrorCode::NoCandidate => "NO_CANDIDATE",
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain layer errors
///
/// `Validation` is a caller error, `Rule` is an expected business outcome,
/// `Database` and `Internal` are infrastructure failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: field {field:?}: {message}")]
    Validation { field: String, message: String },

    #[error("{code}: {message}")]
    Rule { code: ErrorCode, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn rule(code: ErrorCode, message: impl Into<String>) -> Self {
        DomainError::Rule {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::rule(ErrorCode::NotFound, message)
    }

    /// Business rule code, if this is a rule violation
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            DomainError::Rule { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code() == Some(code)
    }
}

/// Reject an empty identifier with a validation error naming the field
pub fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Application layer errors - used by HTTP handlers
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

/// Error body for JSON responses: `{"error": {"code": .., "message": ..}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Domain(DomainError::Validation { message, .. })
            | AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: message.clone(),
                },
            ),
            AppError::Domain(DomainError::Rule { code, message }) => {
                let status = match code {
                    ErrorCode::NotFound => StatusCode::NOT_FOUND,
                    _ => StatusCode::CONFLICT,
                };
                (
                    status,
                    ErrorBody {
                        code: code.as_str().to_string(),
                        message: message.clone(),
                    },
                )
            }
            AppError::Domain(DomainError::Database(msg)) => {
                tracing::error!(error = %msg, "database error");
                internal_body()
            }
            AppError::Domain(DomainError::Internal(msg)) => {
                tracing::error!(error = %msg, "internal error");
                internal_body()
            }
        }
    }
}

fn internal_body() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody {
            code: "INTERNAL_ERROR".to_string(),
            message: "internal server error".to_string(),
        },
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_body();
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(format!("invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(format!("invalid query string: {}", rejection.body_text()))
    }
}
