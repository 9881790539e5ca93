//! Query definitions
//!
//! Read-only requests and the plain records they project into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Book;

/// Page size used when the caller gives none (or a non-positive one)
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size served
pub const MAX_LIMIT: i64 = 100;

/// Query for a single book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBookQuery {
    pub book_id: String,
}

impl GetBookQuery {
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
        }
    }
}

/// Full snapshot of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetBookResult {
    pub id: String,
    pub title: String,
    pub author: String,
    pub is_borrowed: bool,
    pub borrowed_at: Option<DateTime<Utc>>,
    pub return_due_date: Option<DateTime<Utc>>,
    pub version: i64,
}

impl From<&Book> for GetBookResult {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            is_borrowed: book.is_borrowed(),
            borrowed_at: book.borrowed_at(),
            return_due_date: book.return_due_date(),
            version: book.version(),
        }
    }
}

/// Query for a page of books
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListBooksQuery {
    pub limit: i64,
    pub offset: i64,
}

impl ListBooksQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Apply the pagination policy: non-positive limit means the default,
    /// limit is capped, negative offset means zero.
    pub fn effective(&self) -> (i64, i64) {
        let limit = if self.limit <= 0 {
            DEFAULT_LIMIT
        } else {
            self.limit.min(MAX_LIMIT)
        };
        let offset = self.offset.max(0);

        (limit, offset)
    }
}

/// Listing view of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub is_borrowed: bool,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            is_borrowed: book.is_borrowed(),
        }
    }
}

/// A page of books plus the total and the effective paging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBooksResult {
    pub books: Vec<BookSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
