//! Borrow Book Handler
//!
//! Loads the book, lends it out and persists it under the version check.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::{BookId, BorrowerEmail, DomainError, OperationContext};
use crate::error::{AppError, AppResult};
use crate::repository::BookRepository;

use super::{publish_events, BorrowBookCommand, BorrowBookResult};

/// Source of the borrow time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Handler for borrowing books
pub struct BorrowBookHandler {
    repository: Arc<dyn BookRepository>,
    clock: Clock,
}

impl BorrowBookHandler {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self {
            repository,
            // Microsecond precision is what PostgreSQL stores
            clock: Arc::new(|| Utc::now().trunc_subsecs(6)),
        }
    }

    /// Replace the clock (tests, replays)
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Execute the borrow book command
    pub async fn execute(
        &self,
        command: BorrowBookCommand,
        context: &OperationContext,
    ) -> AppResult<BorrowBookResult> {
        let book_id = BookId::parse(&command.book_id)?;

        // An empty borrower is the aggregate's BorrowerRequired rule
        if !command.borrower.is_empty() {
            BorrowerEmail::new(command.borrower.as_str())?;
        }

        let mut book = self
            .repository
            .get_by_id(&book_id)
            .await?
            .ok_or_else(|| DomainError::BookNotFound(book_id.to_string()))?;

        book.borrow(&command.borrower, (self.clock)())?;

        self.repository.update(&mut book).await?;

        publish_events(&mut book, context);

        let (borrowed_at, return_due_date) = match (book.borrowed_at(), book.return_due_date()) {
            (Some(borrowed_at), Some(due)) => (borrowed_at, due),
            _ => {
                return Err(AppError::Internal(format!(
                    "Book {} lost its borrow state after update",
                    book_id
                )))
            }
        };

        Ok(BorrowBookResult {
            book_id: book.id().to_string(),
            title: book.title().to_string(),
            borrowed_at,
            return_due_date,
        })
    }
}
