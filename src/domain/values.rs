//! Bibliographic values
//!
//! Title and Author are validated at construction time, so a `Book`
//! can never hold an empty or oversized value. `BorrowerEmail` checks the
//! address a borrow is recorded under.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

use super::DomainError;

/// Maximum title length, counted in characters
pub const MAX_TITLE_CHARS: usize = 100;

/// Title of a catalog item.
///
/// # Invariants
/// - Not empty
/// - At most 100 characters (Unicode scalar values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }

        if value.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::validation(
                "title",
                format!("Title cannot exceed {} characters", MAX_TITLE_CHARS),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Title {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Title::new(value)
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0
    }
}

/// Author of a catalog item. Must not be empty; no length cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Author(String);

impl Author {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::validation("author", "Author cannot be empty"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Author {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Author::new(value)
    }
}

impl From<Author> for String {
    fn from(author: Author) -> Self {
        author.0
    }
}

/// Address of the person borrowing a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BorrowerEmail(String);

impl BorrowerEmail {
    /// An empty value is `BorrowerRequired`; anything that is not an
    /// address is a validation error on `borrower_email`.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::BorrowerRequired);
        }

        if !value.validate_email() {
            return Err(DomainError::validation(
                "borrower_email",
                "Borrower email is not a valid address",
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BorrowerEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BorrowerEmail {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BorrowerEmail::new(value)
    }
}

impl From<BorrowerEmail> for String {
    fn from(email: BorrowerEmail) -> Self {
        email.0
    }
}
