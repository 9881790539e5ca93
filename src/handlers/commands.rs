//! Command definitions
//!
//! Commands represent intentions to change the catalog. Fields are raw
//! primitives; handlers turn them into domain values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =========================================================================
// AddBookCommand
// =========================================================================

/// Command to add a book to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookCommand {
    pub title: String,
    pub author: String,
}

impl AddBookCommand {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Result of a successful add
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookResult {
    pub id: String,
    pub title: String,
    pub author: String,
    pub is_borrowed: bool,
}

// =========================================================================
// BorrowBookCommand
// =========================================================================

/// Command to lend a book out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowBookCommand {
    pub book_id: String,
    /// Identifies who borrows the book (an email address over HTTP)
    pub borrower: String,
}

impl BorrowBookCommand {
    pub fn new(book_id: impl Into<String>, borrower: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            borrower: borrower.into(),
        }
    }
}

/// Result of a successful borrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowBookResult {
    pub book_id: String,
    pub title: String,
    pub borrowed_at: DateTime<Utc>,
    pub return_due_date: DateTime<Utc>,
}

// =========================================================================
// ReturnBookCommand
// =========================================================================

/// Command to take a book back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnBookCommand {
    pub book_id: String,
}

impl ReturnBookCommand {
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
        }
    }
}

/// Result of a successful return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnBookResult {
    pub book_id: String,
    pub title: String,
}
