//! Domain module
//!
//! Core domain types: value objects, events and errors.

pub mod book_id;
pub mod context;
pub mod error;
pub mod events;
pub mod values;

pub use book_id::BookId;
pub use context::OperationContext;
pub use error::DomainError;
pub use events::BookEvent;
pub use values::{Author, BorrowerEmail, Title, MAX_TITLE_CHARS};
