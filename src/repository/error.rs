//! Repository Errors
//!
//! Error types for book persistence.

use crate::domain::{BookId, DomainError};

/// Errors that can occur in a book repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A book with this ID is already stored
    #[error("Book already exists: {0}")]
    AlreadyExists(BookId),

    /// Optimistic concurrency conflict
    #[error("Concurrency conflict for book {book_id}: expected version {expected}, found {actual}")]
    Conflict {
        book_id: BookId,
        expected: i64,
        actual: i64,
    },

    /// Update target no longer exists
    #[error("Book not found: {0}")]
    NotFound(BookId),

    /// Stored row failed domain validation
    #[error("Corrupt book row {id}: {source}")]
    CorruptRow {
        id: String,
        #[source]
        source: DomainError,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Check if this error is an optimistic concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict { .. })
    }

    /// Check if this error is an infrastructure fault
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            RepositoryError::Database(_) | RepositoryError::CorruptRow { .. }
        )
    }
}
