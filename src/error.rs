//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::repository::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Error classification used by the boundary layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed client input; never retried
    Validation,
    /// No row for the requested identifier
    NotFound,
    /// Aggregate rule rejected the transition
    BusinessRule,
    /// Concurrent modification or duplicate identity
    Conflict,
    /// Storage or connectivity fault
    Infrastructure,
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Book already exists: {0}")]
    BookAlreadyExists(String),

    #[error("Version conflict: concurrent modification detected")]
    VersionConflict { expected: i64, actual: i64 },

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::AlreadyExists(id) => AppError::BookAlreadyExists(id.to_string()),
            RepositoryError::Conflict {
                expected, actual, ..
            } => AppError::VersionConflict { expected, actual },
            RepositoryError::NotFound(id) => {
                AppError::Domain(DomainError::BookNotFound(id.to_string()))
            }
            RepositoryError::CorruptRow { id, source } => {
                AppError::Internal(format!("Corrupt book row {}: {}", id, source))
            }
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl AppError {
    /// Classify this error without looking at its message
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::BookAlreadyExists(_) | AppError::VersionConflict { .. } => {
                ErrorKind::Conflict
            }
            AppError::Domain(e) if e.is_validation_error() => ErrorKind::Validation,
            AppError::Domain(e) if e.is_not_found() => ErrorKind::NotFound,
            AppError::Domain(_) => ErrorKind::BusinessRule,
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Infrastructure,
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BookAlreadyExists(_) => "book_already_exists",
            AppError::VersionConflict { .. } => "version_conflict",
            AppError::Domain(e) => match e {
                DomainError::Validation { .. } => "validation_error",
                DomainError::BookIdEmpty => "book_id_empty",
                DomainError::BookIdInvalidFormat => "invalid_book_id",
                DomainError::BookNotFound(_) => "book_not_found",
                DomainError::BookAlreadyBorrowed => "book_already_borrowed",
                DomainError::BookNotBorrowed => "book_not_borrowed",
                DomainError::BorrowerRequired => "borrower_required",
            },
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BusinessRule | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let details = match &self {
            AppError::Domain(DomainError::Validation { field, .. }) => Some(field.clone()),
            AppError::Domain(DomainError::BookNotFound(id)) | AppError::BookAlreadyExists(id) => {
                Some(id.clone())
            }
            AppError::VersionConflict { expected, actual } => {
                Some(format!("expected {}, found {}", expected, actual))
            }
            _ => None,
        };

        // Infrastructure details stay in the log, not in the response
        let error = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: self.error_code().to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookId;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            AppError::from(DomainError::BookIdInvalidFormat).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(DomainError::validation("title", "too long")).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(DomainError::BookNotFound("x".to_string())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AppError::from(DomainError::BookAlreadyBorrowed).kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(
            AppError::VersionConflict { expected: 1, actual: 2 }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        let id = BookId::generate();

        let conflict = AppError::from(RepositoryError::Conflict {
            book_id: id,
            expected: 3,
            actual: 4,
        });
        assert!(matches!(
            conflict,
            AppError::VersionConflict {
                expected: 3,
                actual: 4
            }
        ));

        let missing = AppError::from(RepositoryError::NotFound(id));
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.error_code(), "book_not_found");
        match missing {
            AppError::Domain(DomainError::BookNotFound(missing_id)) => {
                assert_eq!(missing_id, id.to_string())
            }
            other => panic!("Expected BookNotFound, got: {:?}", other),
        }

        let duplicate = AppError::from(RepositoryError::AlreadyExists(id));
        assert_eq!(duplicate.kind(), ErrorKind::Conflict);

        let corrupt = AppError::from(RepositoryError::CorruptRow {
            id: "bad".to_string(),
            source: DomainError::BookIdInvalidFormat,
        });
        assert_eq!(corrupt.kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::from(DomainError::BookIdEmpty), StatusCode::BAD_REQUEST),
            (AppError::from(DomainError::BookNotFound("x".to_string())), StatusCode::NOT_FOUND),
            (AppError::from(DomainError::BookNotBorrowed), StatusCode::CONFLICT),
            (
                AppError::VersionConflict {
                    expected: 0,
                    actual: 1,
                },
                StatusCode::CONFLICT,
            ),
            (AppError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
