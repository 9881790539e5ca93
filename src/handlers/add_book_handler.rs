//! Add Book Handler
//!
//! Validates title and author, creates the aggregate and stores it.

use std::sync::Arc;

use crate::aggregate::Book;
use crate::domain::{Author, BookId, OperationContext, Title};
use crate::error::AppResult;
use crate::repository::BookRepository;

use super::{publish_events, AddBookCommand, AddBookResult};

/// Handler for adding books
pub struct AddBookHandler {
    repository: Arc<dyn BookRepository>,
}

impl AddBookHandler {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Execute the add book command
    pub async fn execute(
        &self,
        command: AddBookCommand,
        context: &OperationContext,
    ) -> AppResult<AddBookResult> {
        let title = Title::new(command.title)?;
        let author = Author::new(command.author)?;

        let mut book = Book::new(BookId::generate(), title, author);

        self.repository.add(&book).await?;

        publish_events(&mut book, context);

        Ok(AddBookResult {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            is_borrowed: book.is_borrowed(),
        })
    }
}
