//! List Books Handler
//!
//! Fetches a page and the total count concurrently.

use std::sync::Arc;

use crate::domain::OperationContext;
use crate::error::AppResult;
use crate::repository::BookRepository;

use super::{BookSummary, ListBooksQuery, ListBooksResult};

/// Handler for paginated listings
pub struct ListBooksHandler {
    repository: Arc<dyn BookRepository>,
}

impl ListBooksHandler {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Execute the list books query
    pub async fn execute(
        &self,
        query: ListBooksQuery,
        context: &OperationContext,
    ) -> AppResult<ListBooksResult> {
        let (limit, offset) = query.effective();

        // Both branches always run to completion; either failure fails the page
        let (books, total) = tokio::join!(
            self.repository.list(limit, offset),
            self.repository.count()
        );
        let books = books?;
        let total = total?;

        tracing::debug!(
            limit,
            offset,
            returned = books.len(),
            total,
            correlation_id = ?context.correlation_id,
            "Books listed"
        );

        Ok(ListBooksResult {
            books: books.iter().map(BookSummary::from).collect(),
            total,
            limit,
            offset,
        })
    }
}
