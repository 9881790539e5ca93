//! Book Aggregate
//!
//! Aggregate root of the catalog. A book is either available or borrowed;
//! `borrow` and `return_book` are the only transitions.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Author, BookEvent, BookId, DomainError, Title};

use super::Aggregate;

/// Length of a loan
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Lending state of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Available,
    Borrowed,
}

/// Book Aggregate
///
/// # Invariants
/// - Not borrowed: `borrowed_at` and `return_due_date` are both `None`
/// - Borrowed: `borrowed_at` is set and `return_due_date` is 14 days later
#[derive(Debug, Clone)]
pub struct Book {
    id: BookId,
    title: Title,
    author: Author,
    is_borrowed: bool,
    borrowed_at: Option<DateTime<Utc>>,
    return_due_date: Option<DateTime<Utc>>,

    /// Stored version this snapshot corresponds to
    version: i64,

    /// Recorded but not yet drained events (never persisted)
    pending_events: Vec<BookEvent>,
}

impl Book {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a new, available book and record `BookAdded`
    pub fn new(id: BookId, title: Title, author: Author) -> Self {
        let event = BookEvent::BookAdded {
            book_id: id,
            title: title.to_string(),
            author: author.to_string(),
        };

        Self {
            id,
            title,
            author,
            is_borrowed: false,
            borrowed_at: None,
            return_due_date: None,
            version: 0,
            pending_events: vec![event],
        }
    }

    /// Rebuild a book from persisted state (used by repositories only).
    ///
    /// Fails if the borrow fields disagree with `is_borrowed`, or if the due
    /// date is not exactly one loan period after the borrow time.
    pub fn reconstruct(
        id: BookId,
        title: Title,
        author: Author,
        is_borrowed: bool,
        borrowed_at: Option<DateTime<Utc>>,
        return_due_date: Option<DateTime<Utc>>,
        version: i64,
    ) -> Result<Self, DomainError> {
        match (is_borrowed, borrowed_at, return_due_date) {
            (true, Some(at), Some(due)) => {
                if due != at + Duration::days(LOAN_PERIOD_DAYS) {
                    return Err(DomainError::validation(
                        "borrow_state",
                        format!(
                            "Book {} is not due {} days after borrowing",
                            id, LOAN_PERIOD_DAYS
                        ),
                    ));
                }
            }
            (false, None, None) => {}
            _ => {
                return Err(DomainError::validation(
                    "borrow_state",
                    format!("Book {} has inconsistent borrow fields", id),
                ));
            }
        }

        if version < 0 {
            return Err(DomainError::validation(
                "version",
                format!("Book {} has negative version {}", id, version),
            ));
        }

        Ok(Self {
            id,
            title,
            author,
            is_borrowed,
            borrowed_at,
            return_due_date,
            version,
            pending_events: Vec::new(),
        })
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Lend the book to `borrower` at time `at`.
    ///
    /// The caller supplies the clock; the due date is `at + 14 days`.
    pub fn borrow(&mut self, borrower: &str, at: DateTime<Utc>) -> Result<(), DomainError> {
        if self.is_borrowed {
            return Err(DomainError::BookAlreadyBorrowed);
        }
        if borrower.is_empty() {
            return Err(DomainError::BorrowerRequired);
        }

        let due = at + Duration::days(LOAN_PERIOD_DAYS);

        self.is_borrowed = true;
        self.borrowed_at = Some(at);
        self.return_due_date = Some(due);

        self.pending_events.push(BookEvent::BookBorrowed {
            book_id: self.id,
            title: self.title.to_string(),
            borrower: borrower.to_string(),
            borrowed_at: at,
            return_due_date: due,
        });

        Ok(())
    }

    /// Take the book back.
    pub fn return_book(&mut self) -> Result<(), DomainError> {
        if !self.is_borrowed {
            return Err(DomainError::BookNotBorrowed);
        }

        self.is_borrowed = false;
        self.borrowed_at = None;
        self.return_due_date = None;

        self.pending_events.push(BookEvent::BookReturned { book_id: self.id });

        Ok(())
    }

    /// Take the recorded events, leaving the buffer empty
    pub fn drain_events(&mut self) -> Vec<BookEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Called by repositories after a successful versioned write
    pub(crate) fn advance_version(&mut self) {
        self.version += 1;
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn is_borrowed(&self) -> bool {
        self.is_borrowed
    }

    pub fn borrowed_at(&self) -> Option<DateTime<Utc>> {
        self.borrowed_at
    }

    pub fn return_due_date(&self) -> Option<DateTime<Utc>> {
        self.return_due_date
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn pending_events(&self) -> &[BookEvent] {
        &self.pending_events
    }

    pub fn state(&self) -> BookState {
        if self.is_borrowed {
            BookState::Borrowed
        } else {
            BookState::Available
        }
    }
}

impl Aggregate for Book {
    type Event = BookEvent;
    type Id = BookId;

    fn aggregate_type() -> &'static str {
        "Book"
    }

    fn id(&self) -> BookId {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn drain_events(&mut self) -> Vec<BookEvent> {
        Book::drain_events(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_book() -> Book {
        Book::new(
            BookId::generate(),
            Title::new("Clean Code").unwrap(),
            Author::new("Robert Martin").unwrap(),
        )
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_new_book_is_available() {
        let book = test_book();

        assert!(!book.is_borrowed());
        assert_eq!(book.state(), BookState::Available);
        assert!(book.borrowed_at().is_none());
        assert!(book.return_due_date().is_none());
        assert_eq!(book.version(), 0);
        assert_eq!(book.title().as_str(), "Clean Code");
        assert_eq!(book.author().as_str(), "Robert Martin");
    }

    #[test]
    fn test_new_book_records_added_event() {
        let mut book = test_book();
        let events = book.drain_events();

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], BookEvent::BookAdded { .. }));
        assert!(book.drain_events().is_empty());
    }

    #[test]
    fn test_borrow_success() {
        let mut book = test_book();
        book.drain_events();

        book.borrow("a@b.com", at()).unwrap();

        assert!(book.is_borrowed());
        assert_eq!(book.state(), BookState::Borrowed);
        assert_eq!(book.borrowed_at(), Some(at()));
        assert_eq!(
            book.return_due_date(),
            Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap())
        );

        let events = book.drain_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            BookEvent::BookBorrowed {
                book_id,
                title,
                borrower,
                borrowed_at,
                return_due_date,
            } => {
                assert_eq!(*book_id, book.id());
                assert_eq!(title, "Clean Code");
                assert_eq!(borrower, "a@b.com");
                assert_eq!(*borrowed_at, at());
                assert_eq!(*return_due_date - *borrowed_at, Duration::days(14));
            }
            other => panic!("Expected BookBorrowed, got: {:?}", other),
        }
    }

    #[test]
    fn test_due_date_is_exactly_fourteen_days() {
        let instants = [
            at(),
            Utc.with_ymd_and_hms(2024, 2, 20, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 25, 0, 0, 0).unwrap(),
        ];

        for instant in instants {
            let mut book = test_book();
            book.borrow("reader@example.com", instant).unwrap();
            assert_eq!(
                book.return_due_date().unwrap() - book.borrowed_at().unwrap(),
                Duration::days(LOAN_PERIOD_DAYS)
            );
        }
    }

    #[test]
    fn test_borrow_twice_fails() {
        let mut book = test_book();

        assert!(book.borrow("first@example.com", at()).is_ok());
        let result = book.borrow("second@example.com", at() + Duration::hours(1));

        assert_eq!(result, Err(DomainError::BookAlreadyBorrowed));
        // First borrow is kept
        assert_eq!(book.borrowed_at(), Some(at()));
    }

    #[test]
    fn test_borrow_requires_borrower() {
        let mut book = test_book();
        book.drain_events();

        let result = book.borrow("", at());

        assert_eq!(result, Err(DomainError::BorrowerRequired));
        assert!(!book.is_borrowed());
        assert!(book.borrowed_at().is_none());
        assert!(book.pending_events().is_empty());
    }

    #[test]
    fn test_borrowed_check_precedes_borrower_check() {
        let mut book = test_book();
        book.borrow("first@example.com", at()).unwrap();

        assert_eq!(book.borrow("", at()), Err(DomainError::BookAlreadyBorrowed));
    }

    #[test]
    fn test_return_success() {
        let mut book = test_book();
        book.borrow("john@example.com", at()).unwrap();
        book.drain_events();

        book.return_book().unwrap();

        assert!(!book.is_borrowed());
        assert!(book.borrowed_at().is_none());
        assert!(book.return_due_date().is_none());

        let events = book.drain_events();
        assert_eq!(events, vec![BookEvent::BookReturned { book_id: book.id() }]);
    }

    #[test]
    fn test_return_not_borrowed() {
        let mut book = test_book();
        book.drain_events();

        let result = book.return_book();

        assert_eq!(result, Err(DomainError::BookNotBorrowed));
        assert_eq!(book.state(), BookState::Available);
        assert!(book.pending_events().is_empty());
    }

    #[test]
    fn test_borrow_return_round_trip() {
        let mut book = test_book();

        book.borrow("a@b.com", at()).unwrap();
        book.return_book().unwrap();

        assert!(!book.is_borrowed());
        assert!(book.borrowed_at().is_none());
        assert!(book.return_due_date().is_none());

        // Can be borrowed again
        assert!(book.borrow("c@d.com", at() + Duration::days(1)).is_ok());
    }

    #[test]
    fn test_transitions_do_not_touch_version() {
        let mut book = test_book();
        book.borrow("a@b.com", at()).unwrap();
        book.return_book().unwrap();
        assert_eq!(book.version(), 0);

        book.advance_version();
        assert_eq!(book.version(), 1);
    }

    #[test]
    fn test_reconstruct_valid_states() {
        let id = BookId::generate();

        let available = Book::reconstruct(
            id,
            Title::new("Refactoring").unwrap(),
            Author::new("Martin Fowler").unwrap(),
            false,
            None,
            None,
            3,
        )
        .unwrap();
        assert_eq!(available.version(), 3);
        assert!(available.pending_events().is_empty());

        let borrowed = Book::reconstruct(
            id,
            Title::new("Refactoring").unwrap(),
            Author::new("Martin Fowler").unwrap(),
            true,
            Some(at()),
            Some(at() + Duration::days(14)),
            4,
        )
        .unwrap();
        assert_eq!(borrowed.state(), BookState::Borrowed);
    }

    #[test]
    fn test_reconstruct_rejects_inconsistent_borrow_fields() {
        let result = Book::reconstruct(
            BookId::generate(),
            Title::new("Refactoring").unwrap(),
            Author::new("Martin Fowler").unwrap(),
            false,
            Some(at()),
            None,
            1,
        );

        assert!(matches!(
            result,
            Err(DomainError::Validation { ref field, .. }) if field == "borrow_state"
        ));
    }

    #[test]
    fn test_reconstruct_rejects_wrong_due_date() {
        for due in [at() - Duration::days(3), at() + Duration::days(15), at()] {
            let result = Book::reconstruct(
                BookId::generate(),
                Title::new("Refactoring").unwrap(),
                Author::new("Martin Fowler").unwrap(),
                true,
                Some(at()),
                Some(due),
                1,
            );

            assert!(matches!(
                result,
                Err(DomainError::Validation { ref field, .. }) if field == "borrow_state"
            ));
        }
    }

    #[test]
    fn test_aggregate_trait() {
        let mut book = test_book();

        assert_eq!(<Book as Aggregate>::aggregate_type(), "Book");
        assert_eq!(Aggregate::version(&book), 0);
        assert_eq!(Aggregate::drain_events(&mut book).len(), 1);
    }
}
