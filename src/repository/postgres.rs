//! PostgreSQL Book Repository
//!
//! Maps `Book` aggregates to rows of the `books` table. Reads are routed
//! to a replica, writes to the primary.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::aggregate::Book;
use crate::db::DbCluster;
use crate::domain::{Author, BookId, DomainError, Title};

use super::{BookRepository, RepositoryError};

/// Columns selected for every book read
const BOOK_COLUMNS: &str =
    "id, title, author, is_borrowed, borrowed_at, return_due_date, version";

type BookRecord = (
    String,
    String,
    String,
    bool,
    Option<DateTime<Utc>>,
    Option<DateTime<Utc>>,
    i64,
);

/// Book row from the database
#[derive(Debug, Clone)]
struct BookRow {
    id: String,
    title: String,
    author: String,
    is_borrowed: bool,
    borrowed_at: Option<DateTime<Utc>>,
    return_due_date: Option<DateTime<Utc>>,
    version: i64,
}

impl From<BookRecord> for BookRow {
    fn from(
        (id, title, author, is_borrowed, borrowed_at, return_due_date, version): BookRecord,
    ) -> Self {
        Self {
            id,
            title,
            author,
            is_borrowed,
            borrowed_at,
            return_due_date,
            version,
        }
    }
}

impl BookRow {
    /// Rebuild the aggregate, re-validating every field
    fn into_book(self) -> Result<Book, RepositoryError> {
        let id = self.id;
        let corrupt = |source: DomainError| RepositoryError::CorruptRow {
            id: id.clone(),
            source,
        };

        let book_id = BookId::parse(&id).map_err(corrupt)?;
        let title = Title::new(self.title).map_err(corrupt)?;
        let author = Author::new(self.author).map_err(corrupt)?;

        Book::reconstruct(
            book_id,
            title,
            author,
            self.is_borrowed,
            self.borrowed_at,
            self.return_due_date,
            self.version,
        )
        .map_err(corrupt)
    }
}

/// Book repository backed by a primary/replica PostgreSQL cluster
#[derive(Debug, Clone)]
pub struct PgBookRepository {
    cluster: Arc<DbCluster>,
}

impl PgBookRepository {
    pub fn new(cluster: Arc<DbCluster>) -> Self {
        Self { cluster }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn add(&self, book: &Book) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO books (id, title, author, is_borrowed, borrowed_at, return_due_date, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(book.id().to_string())
        .bind(book.title().as_str())
        .bind(book.author().as_str())
        .bind(book.is_borrowed())
        .bind(book.borrowed_at())
        .bind(book.return_due_date())
        .bind(book.version())
        .execute(self.cluster.primary())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::AlreadyExists(book.id()));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: &BookId) -> Result<Option<Book>, RepositoryError> {
        let record: Option<BookRecord> = sqlx::query_as(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(self.cluster.replica())
        .await?;

        record.map(|r| BookRow::from(r).into_book()).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Book>, RepositoryError> {
        let records: Vec<BookRecord> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM books
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
            BOOK_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.cluster.replica())
        .await?;

        records
            .into_iter()
            .map(|r| BookRow::from(r).into_book())
            .collect()
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(self.cluster.replica())
            .await?;

        Ok(count)
    }

    async fn update(&self, book: &mut Book) -> Result<(), RepositoryError> {
        let expected = book.version();

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, is_borrowed = $4,
                borrowed_at = $5, return_due_date = $6, version = version + 1
            WHERE id = $1 AND version = $7
            "#,
        )
        .bind(book.id().to_string())
        .bind(book.title().as_str())
        .bind(book.author().as_str())
        .bind(book.is_borrowed())
        .bind(book.borrowed_at())
        .bind(book.return_due_date())
        .bind(expected)
        .execute(self.cluster.primary())
        .await?;

        if result.rows_affected() == 1 {
            book.advance_version();
            return Ok(());
        }

        // Nothing written: find out whether the row moved on or vanished.
        // Read from the primary, a replica may lag behind the write that won.
        let actual: Option<i64> = sqlx::query_scalar("SELECT version FROM books WHERE id = $1")
            .bind(book.id().to_string())
            .fetch_optional(self.cluster.primary())
            .await?;

        match actual {
            Some(actual) => {
                tracing::warn!(
                    book_id = %book.id(),
                    expected,
                    actual,
                    "Version conflict on book update"
                );
                Err(RepositoryError::Conflict {
                    book_id: book.id(),
                    expected,
                    actual,
                })
            }
            None => Err(RepositoryError::NotFound(book.id())),
        }
    }

    async fn remove(&self, id: &BookId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id.to_string())
            .execute(self.cluster.primary())
            .await?;

        Ok(())
    }
}
