//! In-memory Book Repository
//!
//! Same contract as the PostgreSQL repository, including the version check,
//! without a database. Used by tests and local tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::aggregate::Book;
use crate::domain::BookId;

use super::{BookRepository, RepositoryError};

#[derive(Debug, Clone)]
struct StoredBook {
    book: Book,
    /// Insertion sequence, stands in for `created_at`
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    books: HashMap<BookId, StoredBook>,
    next_seq: u64,
}

/// Book repository holding rows in a map
#[derive(Debug, Default)]
pub struct InMemoryBookRepository {
    inner: RwLock<Inner>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Stored copy without the transient event buffer
fn snapshot(book: &Book) -> Book {
    let mut stored = book.clone();
    stored.drain_events();
    stored
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn add(&self, book: &Book) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.books.contains_key(&book.id()) {
            return Err(RepositoryError::AlreadyExists(book.id()));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.books.insert(
            book.id(),
            StoredBook {
                book: snapshot(book),
                seq,
            },
        );

        Ok(())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.books.get(id).map(|stored| stored.book.clone()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Book>, RepositoryError> {
        let inner = self.inner.read().await;

        let mut stored: Vec<&StoredBook> = inner.books.values().collect();
        stored.sort_by(|a, b| b.seq.cmp(&a.seq));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(stored
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|s| s.book.clone())
            .collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.books.len() as i64)
    }

    async fn update(&self, book: &mut Book) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .books
            .get_mut(&book.id())
            .ok_or(RepositoryError::NotFound(book.id()))?;

        let actual = stored.book.version();
        if actual != book.version() {
            return Err(RepositoryError::Conflict {
                book_id: book.id(),
                expected: book.version(),
                actual,
            });
        }

        book.advance_version();
        stored.book = snapshot(book);

        Ok(())
    }

    async fn remove(&self, id: &BookId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.books.remove(id);
        Ok(())
    }
}
