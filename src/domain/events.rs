//! Domain Events
//!
//! Immutable facts recorded by the `Book` aggregate on each successful
//! transition. The event name and payload fields are a stable contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookId;

/// Book-related events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookEvent {
    /// Book was added to the catalog
    BookAdded {
        book_id: BookId,
        title: String,
        author: String,
    },

    /// Book was lent out
    BookBorrowed {
        book_id: BookId,
        title: String,
        borrower: String,
        borrowed_at: DateTime<Utc>,
        return_due_date: DateTime<Utc>,
    },

    /// Book came back
    BookReturned { book_id: BookId },
}

impl BookEvent {
    /// Get the stable event name
    pub fn event_name(&self) -> &'static str {
        match self {
            BookEvent::BookAdded { .. } => "catalog.book_added",
            BookEvent::BookBorrowed { .. } => "catalog.book_borrowed",
            BookEvent::BookReturned { .. } => "catalog.book_returned",
        }
    }

    /// Get the book ID this event relates to
    pub fn book_id(&self) -> BookId {
        match self {
            BookEvent::BookAdded { book_id, .. } => *book_id,
            BookEvent::BookBorrowed { book_id, .. } => *book_id,
            BookEvent::BookReturned { book_id } => *book_id,
        }
    }
}
