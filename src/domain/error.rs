//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent input validation failures and business rule
/// violations raised by value objects and the `Book` aggregate.
/// They are independent of the web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A field failed validation
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Book ID was empty
    #[error("Book ID cannot be empty")]
    BookIdEmpty,

    /// Book ID was not a canonical UUID
    #[error("Book ID must be a valid UUID")]
    BookIdInvalidFormat,

    /// Book not found
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// Borrow attempted on a borrowed book
    #[error("Book is already borrowed")]
    BookAlreadyBorrowed,

    /// Return attempted on an available book
    #[error("Book is not borrowed")]
    BookNotBorrowed,

    /// Borrow attempted without a borrower
    #[error("Borrower is required")]
    BorrowerRequired,
}

impl DomainError {
    /// Create a field validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this is an input validation error (never retried)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::BookIdEmpty | Self::BookIdInvalidFormat
        )
    }

    /// Check if this is a business rule violation raised by the aggregate
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::BookAlreadyBorrowed | Self::BookNotBorrowed | Self::BorrowerRequired
        )
    }

    /// Check if this is a lookup fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BookNotFound(_))
    }
}
