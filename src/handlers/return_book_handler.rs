//! Return Book Handler

use std::sync::Arc;

use crate::domain::{BookId, DomainError, OperationContext};
use crate::error::AppResult;
use crate::repository::BookRepository;

use super::{publish_events, ReturnBookCommand, ReturnBookResult};

/// Handler for returning books
pub struct ReturnBookHandler {
    repository: Arc<dyn BookRepository>,
}

impl ReturnBookHandler {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Execute the return book command
    pub async fn execute(
        &self,
        command: ReturnBookCommand,
        context: &OperationContext,
    ) -> AppResult<ReturnBookResult> {
        let book_id = BookId::parse(&command.book_id)?;

        let mut book = self
            .repository
            .get_by_id(&book_id)
            .await?
            .ok_or_else(|| DomainError::BookNotFound(book_id.to_string()))?;

        book.return_book()?;

        self.repository.update(&mut book).await?;

        publish_events(&mut book, context);

        Ok(ReturnBookResult {
            book_id: book.id().to_string(),
            title: book.title().to_string(),
        })
    }
}
