//! Repository module
//!
//! Persistence contract for the `Book` aggregate and its implementations.
//! Handlers depend on the `BookRepository` trait only.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::aggregate::Book;
use crate::domain::BookId;

pub use error::RepositoryError;
pub use memory::InMemoryBookRepository;
pub use postgres::PgBookRepository;

/// Persistence operations for books
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Store a new book. Fails with `AlreadyExists` if the ID is taken.
    async fn add(&self, book: &Book) -> Result<(), RepositoryError>;

    /// Load a book. `Ok(None)` when no row matches.
    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError>;

    /// A page of books, most recently created first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Book>, RepositoryError>;

    /// Total number of books.
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Persist a mutated book if the stored version still matches
    /// `book.version()`. On success the stored and in-memory versions
    /// both advance by one; otherwise `Conflict` is returned and nothing
    /// is written.
    async fn update(&self, book: &mut Book) -> Result<(), RepositoryError>;

    /// Delete a book. Removing an absent ID is not an error.
    async fn remove(&self, id: &BookId) -> Result<(), RepositoryError>;
}
