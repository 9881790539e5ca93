//! Command and Query Handlers module
//!
//! CQRS handlers that orchestrate one use case each. Handlers depend on the
//! `BookRepository` trait only and never embed SQL or HTTP concerns.

mod add_book_handler;
mod borrow_book_handler;
mod commands;
mod get_book_handler;
mod list_books_handler;
mod queries;
mod return_book_handler;


use serde::Serialize;

use crate::aggregate::Aggregate;
use crate::domain::OperationContext;

pub use add_book_handler::AddBookHandler;
pub use borrow_book_handler::{BorrowBookHandler, Clock};
pub use commands::*;
pub use get_book_handler::GetBookHandler;
pub use list_books_handler::ListBooksHandler;
pub use queries::*;
pub use return_book_handler::ReturnBookHandler;

/// Drain an aggregate's recorded events after a successful persist and
/// publish them to the structured log.
pub(crate) fn publish_events<A>(aggregate: &mut A, context: &OperationContext)
where
    A: Aggregate,
    A::Event: Serialize,
{
    for event in aggregate.drain_events() {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        tracing::info!(
            aggregate_type = A::aggregate_type(),
            aggregate_id = %aggregate.id(),
            version = aggregate.version(),
            correlation_id = ?context.correlation_id,
            payload = %payload,
            "Domain event published"
        );
    }
}
