//! Get Book Handler

use std::sync::Arc;

use crate::domain::{BookId, DomainError, OperationContext};
use crate::error::AppResult;
use crate::repository::BookRepository;

use super::{GetBookQuery, GetBookResult};

/// Handler for single-book lookups
pub struct GetBookHandler {
    repository: Arc<dyn BookRepository>,
}

impl GetBookHandler {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Execute the get book query
    pub async fn execute(
        &self,
        query: GetBookQuery,
        context: &OperationContext,
    ) -> AppResult<GetBookResult> {
        let book_id = BookId::parse(&query.book_id)?;

        let book = self
            .repository
            .get_by_id(&book_id)
            .await?
            .ok_or_else(|| DomainError::BookNotFound(book_id.to_string()))?;

        tracing::debug!(
            book_id = %book_id,
            correlation_id = ?context.correlation_id,
            "Book loaded"
        );

        Ok(GetBookResult::from(&book))
    }
}
